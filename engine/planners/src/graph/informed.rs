//! A* graph search with cost relaxation.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use engine_core::{check_decision_state, Environment, Outcome, PlanError, Planner};
use tracing::{debug, trace};

use super::{NodeId, SearchGraph};
use crate::stats::DecisionStats;

const PLANNER: &str = "astar";

/// Frontier entry. Pops in ascending `total_cost`, then deeper first, then in
/// insertion order.
#[derive(Debug, Clone, Copy)]
struct Entry {
    total_cost: f64,
    depth: u32,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the "greatest" entry is the one to expand
        other
            .total_cost
            .total_cmp(&self.total_cost)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Informed graph planner (A*).
///
/// Expands the frontier node with the lowest `depth + heuristic`, preferring
/// deeper nodes on equal cost. A cheaper path to a state that is still on the
/// frontier re-parents its node; expanded states are never reopened. On
/// exhaustion the planner returns the first action of the path to the node
/// being expanded, or, while still expanding the root, of the cheapest child
/// generated so far.
#[derive(Debug, Default)]
pub struct InformedGraphPlanner {
    last_stats: Option<DecisionStats>,
}

impl InformedGraphPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }

    fn search<E: Environment>(
        &self,
        env: &mut E,
        state: &E::State,
        stats: &mut DecisionStats,
    ) -> Result<E::Action, PlanError> {
        let mut graph = SearchGraph::new(state.clone(), env.heuristic(state));
        let mut best: HashMap<E::State, NodeId> = HashMap::from([(state.clone(), NodeId::ROOT)]);
        let mut closed: HashSet<E::State> = HashSet::new();
        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;
        let mut relaxations = 0u32;

        push(&mut frontier, &graph, NodeId::ROOT, &mut seq);

        while let Some(entry) = frontier.pop() {
            let current = entry.node;
            let node = graph.get(current);
            // Superseded by a relaxation
            if entry.total_cost > node.total_cost || entry.depth != node.depth {
                continue;
            }
            let node_state = node.state.clone();
            if !closed.insert(node_state.clone()) {
                continue;
            }
            if env.is_win(&node_state) {
                trace!(depth = entry.depth, relaxations, "astar reached a win");
                return graph
                    .first_action(current)
                    .ok_or(PlanError::NoLegalFallback { planner: PLANNER });
            }
            if env.is_lose(&node_state) {
                continue;
            }

            stats.iterations += 1;
            for action in env.legal_actions(&node_state) {
                let next = match env.step(&node_state, action) {
                    Outcome::Continue(next) => next,
                    Outcome::Exhausted(_) => {
                        stats.exhausted = true;
                        return graph
                            .first_action(current)
                            .or_else(|| cheapest_root_child(&graph))
                            .ok_or(PlanError::NoLegalFallback { planner: PLANNER });
                    }
                };
                if closed.contains(&next) {
                    continue;
                }
                match best.get(&next).copied() {
                    None => {
                        let h = env.heuristic(&next);
                        let child = graph.add_child(current, action, next.clone(), h);
                        best.insert(next, child);
                        push(&mut frontier, &graph, child, &mut seq);
                    }
                    Some(existing) => {
                        let via_current = f64::from(graph.get(current).depth + 1)
                            + graph.get(existing).heuristic;
                        if via_current < graph.get(existing).total_cost {
                            graph.relax(existing, current, action);
                            relaxations += 1;
                            push(&mut frontier, &graph, existing, &mut seq);
                        }
                    }
                }
            }
        }

        debug!(nodes = graph.len(), "astar frontier emptied without a win");
        Err(PlanError::NoLegalFallback { planner: PLANNER })
    }
}

fn push<S, A: Copy>(
    frontier: &mut BinaryHeap<Entry>,
    graph: &SearchGraph<S, A>,
    node: NodeId,
    seq: &mut u64,
) {
    let n = graph.get(node);
    frontier.push(Entry {
        total_cost: n.total_cost,
        depth: n.depth,
        seq: *seq,
        node,
    });
    *seq += 1;
}

/// Cheapest direct child of the root, first generated on ties.
fn cheapest_root_child<S, A: Copy>(graph: &SearchGraph<S, A>) -> Option<A> {
    (1..graph.len() as u32)
        .map(NodeId)
        .filter(|&id| graph.get(id).parent == Some(NodeId::ROOT))
        .fold(None::<NodeId>, |best, id| match best {
            Some(b) if graph.get(b).total_cost <= graph.get(id).total_cost => Some(b),
            _ => Some(id),
        })
        .and_then(|id| graph.get(id).action)
}

impl<E: Environment> Planner<E> for InformedGraphPlanner {
    fn name(&self) -> &'static str {
        PLANNER
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        check_decision_state(&*env, state)?;
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let result = self.search(env, state, &mut recorder.stats);

        let stats = recorder.finish(env.remaining());
        debug!(
            expansions = stats.iterations,
            steps = stats.steps_used,
            exhausted = stats.exhausted,
            "astar search finished"
        );
        self.last_stats = Some(stats);
        result
    }
}
