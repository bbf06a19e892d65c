//! MCTS search implementation.
//!
//! Implements the budget-limited MCTS loop:
//! 1. Selection: Descend with UCB1 until a node with untried actions or a leaf
//! 2. Expansion: Pop one untried action and create its child
//! 3. Simulation: Random rollout of bounded depth, scored by the environment
//! 4. Backpropagation: Add the reward and a visit to every node up to the root
//!
//! The loop runs until some `step` reports the budget exhausted, or until the
//! whole reachable tree has been enumerated. Iterations that end on a cached
//! terminal node spend nothing, so the loop also stops after
//! `max_idle_iterations` consecutive iterations that left the budget untouched.

use engine_core::{check_decision_state, Environment, Outcome, PlanError, Planner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Statistics about the last decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Iterations that reached backpropagation
    pub iterations: u32,
    /// Iterations abandoned because expansion ran out of budget
    pub aborted: u32,
    /// Nodes in the tree when the search stopped
    pub nodes: usize,
    /// Steps consumed by the decision
    pub steps_used: u64,
    /// Whether the search stopped because the tree was fully enumerated
    pub enumerated: bool,
}

/// How a single iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Iteration {
    /// Backpropagated; budget remains.
    Complete,
    /// Backpropagated, but the rollout ran out of budget.
    CompleteExhausted,
    /// Expansion ran out of budget; nothing was backpropagated.
    Aborted,
}

/// State of one expanded node, as seen by the rollout.
enum Expansion<S> {
    Expanded { node: NodeId, state: S },
    Exhausted,
}

/// MCTS search state for one decision.
pub struct MctsSearch<'a, E: Environment, R: Rng> {
    tree: MctsTree<E::State, E::Action>,
    env: &'a mut E,
    config: &'a MctsConfig,
    root_state: E::State,
    rng: &'a mut R,
    stats: SearchStats,
}

impl<'a, E: Environment, R: Rng> MctsSearch<'a, E, R> {
    /// Create a new MCTS search rooted at the real current state.
    pub fn new(
        env: &'a mut E,
        config: &'a MctsConfig,
        state: &E::State,
        rng: &'a mut R,
    ) -> Result<Self, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let tree = MctsTree::new(state.clone(), legal);

        Ok(Self {
            tree,
            env,
            config,
            root_state: state.clone(),
            rng,
            stats: SearchStats::default(),
        })
    }

    /// Run until the budget is exhausted, then pick the most-visited root child.
    pub fn run(&mut self) -> Result<E::Action, PlanError> {
        let start_remaining = self.env.remaining();
        let mut idle = 0u32;

        loop {
            if self.tree.get(self.tree.root()).closed {
                self.stats.enumerated = true;
                break;
            }
            let before = self.env.remaining();
            match self.iterate() {
                Iteration::Complete => self.stats.iterations += 1,
                Iteration::CompleteExhausted => {
                    self.stats.iterations += 1;
                    break;
                }
                Iteration::Aborted => {
                    self.stats.aborted += 1;
                    break;
                }
            }
            if self.env.remaining() == before {
                idle += 1;
                if idle >= self.config.max_idle_iterations {
                    trace!(idle, "no budget spent for too long, search converged");
                    break;
                }
            } else {
                idle = 0;
            }
        }

        self.stats.nodes = self.tree.len();
        self.stats.steps_used = start_remaining.saturating_sub(self.env.remaining());

        let stats = self.tree.stats();
        debug!(
            iterations = self.stats.iterations,
            nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            root_value = stats.root_value,
            steps = self.stats.steps_used,
            enumerated = self.stats.enumerated,
            "MCTS search finished"
        );

        self.tree
            .best_action(&mut *self.rng)
            .map(|(action, _)| action)
            .ok_or(PlanError::NoLegalFallback { planner: "mcts" })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(&mut self) -> Iteration {
        let leaf_id = self.select();
        let leaf = self.tree.get(leaf_id);

        // Terminal leaves were scored when created; nothing to simulate
        if leaf.is_terminal {
            let value = leaf.terminal_value;
            self.tree.backpropagate(leaf_id, value);
            return Iteration::Complete;
        }

        let (node_id, state) = if leaf.has_untried() {
            match self.expand(leaf_id) {
                Expansion::Expanded { node, state } => (node, state),
                Expansion::Exhausted => {
                    trace!(leaf = leaf_id.0, "expansion exhausted budget, iteration aborted");
                    return Iteration::Aborted;
                }
            }
        } else {
            // Nothing left to expand below this node; rescoring it lets it close
            let value = leaf.mean_reward();
            self.tree.backpropagate(leaf_id, value);
            return Iteration::Complete;
        };

        let node = self.tree.get(node_id);
        let (reward, exhausted) = if node.is_terminal {
            (node.terminal_value, false)
        } else {
            self.rollout(state)
        };

        self.tree.backpropagate(node_id, reward);

        trace!(
            node = node_id.0,
            depth = self.tree.get(node_id).depth,
            reward,
            exhausted,
            "MCTS iteration complete"
        );

        if exhausted {
            Iteration::CompleteExhausted
        } else {
            Iteration::Complete
        }
    }

    /// Descend from the root with UCB1 until a node that still has untried
    /// actions, or a leaf.
    fn select(&mut self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_leaf() || node.has_untried() {
                return current;
            }
            match self
                .tree
                .select_child(current, self.config.exploration, &mut *self.rng)
            {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Pop one untried action of `parent_id` and create its child.
    fn expand(&mut self, parent_id: NodeId) -> Expansion<E::State> {
        let action = match self.tree.pop_untried(parent_id, &mut *self.rng) {
            Some(action) => action,
            None => return Expansion::Exhausted,
        };

        // The root always holds its state; other nodes only when caching
        let parent_state = match self.tree.get(parent_id).state.clone() {
            Some(state) => state,
            None => match self.replay(parent_id) {
                Replay::Reached(state) => state,
                Replay::Terminal(state) => return self.attach(parent_id, action, state),
                Replay::Exhausted => return self.restore(parent_id, action),
            },
        };

        match self.env.step(&parent_state, action) {
            Outcome::Continue(state) => self.attach(parent_id, action, state),
            Outcome::Exhausted(_) => self.restore(parent_id, action),
        }
    }

    /// Put an action back after a failed expansion so the tree stays consistent.
    fn restore(&mut self, parent_id: NodeId, action: E::Action) -> Expansion<E::State> {
        self.tree.get_mut(parent_id).untried.push(action);
        Expansion::Exhausted
    }

    /// Create the child reached by `action` with the given resulting state.
    fn attach(
        &mut self,
        parent_id: NodeId,
        action: E::Action,
        state: E::State,
    ) -> Expansion<E::State> {
        let legal = if self.env.is_terminal(&state) {
            Vec::new()
        } else {
            self.env.legal_actions(&state)
        };
        let terminal_value = if legal.is_empty() {
            Some(self.env.evaluate(&self.root_state, &state))
        } else {
            None
        };
        let cached = self.config.cache_states.then(|| state.clone());

        let node = self
            .tree
            .add_child(parent_id, action, cached, legal, terminal_value);
        Expansion::Expanded { node, state }
    }

    /// Rebuild the state of `node_id` by replaying its action path from the root.
    fn replay(&mut self, node_id: NodeId) -> Replay<E::State> {
        let mut state = self.root_state.clone();
        for action in self.tree.path_actions(node_id) {
            state = match self.env.step(&state, action) {
                Outcome::Continue(next) => next,
                Outcome::Exhausted(_) => return Replay::Exhausted,
            };
            if self.env.is_terminal(&state) {
                return Replay::Terminal(state);
            }
        }
        Replay::Reached(state)
    }

    /// Random playout of at most `rollout_depth` plies.
    /// Returns the reward and whether the budget ran out during the rollout.
    fn rollout(&mut self, mut state: E::State) -> (f64, bool) {
        let mut exhausted = false;

        for _ in 0..self.config.rollout_depth {
            if self.env.is_terminal(&state) {
                break;
            }
            let legal = self.env.legal_actions(&state);
            if legal.is_empty() {
                break;
            }
            let action = legal[self.rng.gen_range(0..legal.len())];
            match self.env.step(&state, action) {
                Outcome::Continue(next) => state = next,
                Outcome::Exhausted(last) => {
                    state = last;
                    exhausted = true;
                    break;
                }
            }
        }

        (self.env.evaluate(&self.root_state, &state), exhausted)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<E::State, E::Action> {
        &self.tree
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Result of rebuilding a node's state by path replay.
enum Replay<S> {
    Reached(S),
    /// A replayed step landed on a terminal state before the path ended.
    Terminal(S),
    Exhausted,
}

/// Monte Carlo Tree Search planner.
///
/// Builds a fresh tree from the current state on every decision.
#[derive(Debug)]
pub struct MctsPlanner {
    config: MctsConfig,
    rng: ChaCha20Rng,
    last_stats: Option<SearchStats>,
}

impl MctsPlanner {
    /// Create a planner, rejecting invalid tunables.
    pub fn new(config: MctsConfig, seed: u64) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_stats: None,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Statistics of the most recent decision.
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }
}

impl<E: Environment> Planner<E> for MctsPlanner {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let mut search = MctsSearch::new(env, &self.config, state, &mut self.rng)?;
        let result = search.run();
        self.last_stats = Some(search.stats().clone());
        result
    }
}

/// Convenience function to run a single MCTS decision.
pub fn run_mcts<E: Environment, R: Rng>(
    env: &mut E,
    config: &MctsConfig,
    state: &E::State,
    rng: &mut R,
) -> Result<E::Action, PlanError> {
    let mut search = MctsSearch::new(env, config, state, rng)?;
    search.run()
}
