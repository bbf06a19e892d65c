//! Breadth-first and depth-first graph search.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use engine_core::{check_decision_state, Environment, Outcome, PlanError, Planner};
use tracing::{debug, trace};

use super::{NodeId, SearchGraph};
use crate::stats::DecisionStats;

/// Frontier discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// FIFO frontier
    BreadthFirst,
    /// LIFO frontier
    DepthFirst,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::BreadthFirst => f.write_str("bfs"),
            Traversal::DepthFirst => f.write_str("dfs"),
        }
    }
}

/// Uninformed graph planner.
///
/// Searches from the current state until it pops a winning state and returns
/// the first action of the path to it. Goal and lose tests happen when a node
/// is popped; lose states are never expanded. If a step reports the budget
/// exhausted, the planner answers with the cheapest node reached so far that
/// is still waiting on the frontier or being expanded.
#[derive(Debug)]
pub struct UninformedGraphPlanner {
    traversal: Traversal,
    last_stats: Option<DecisionStats>,
}

impl UninformedGraphPlanner {
    pub fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            last_stats: None,
        }
    }

    pub fn breadth_first() -> Self {
        Self::new(Traversal::BreadthFirst)
    }

    pub fn depth_first() -> Self {
        Self::new(Traversal::DepthFirst)
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }

    fn planner_name(&self) -> &'static str {
        match self.traversal {
            Traversal::BreadthFirst => "bfs",
            Traversal::DepthFirst => "dfs",
        }
    }

    fn pop(&self, frontier: &mut VecDeque<NodeId>) -> Option<NodeId> {
        match self.traversal {
            Traversal::BreadthFirst => frontier.pop_front(),
            Traversal::DepthFirst => frontier.pop_back(),
        }
    }

    fn search<E: Environment>(
        &self,
        env: &mut E,
        state: &E::State,
        stats: &mut DecisionStats,
    ) -> Result<E::Action, PlanError> {
        let planner = self.planner_name();
        let mut graph = SearchGraph::new(state.clone(), env.heuristic(state));
        let mut frontier = VecDeque::from([NodeId::ROOT]);
        let mut visited: HashSet<E::State> = HashSet::new();

        while let Some(current) = self.pop(&mut frontier) {
            let node_state = graph.get(current).state.clone();
            if !visited.insert(node_state.clone()) {
                continue;
            }
            if env.is_win(&node_state) {
                trace!(depth = graph.get(current).depth, "{} reached a win", planner);
                return graph
                    .first_action(current)
                    .ok_or(PlanError::NoLegalFallback { planner });
            }
            if env.is_lose(&node_state) {
                continue;
            }

            stats.iterations += 1;
            for action in env.legal_actions(&node_state) {
                match env.step(&node_state, action) {
                    Outcome::Continue(next) => {
                        if !visited.contains(&next) {
                            let h = env.heuristic(&next);
                            let child = graph.add_child(current, action, next, h);
                            frontier.push_back(child);
                        }
                    }
                    Outcome::Exhausted(_) => {
                        stats.exhausted = true;
                        return best_frontier_action(env, &graph, &frontier, current)
                            .ok_or(PlanError::NoLegalFallback { planner });
                    }
                }
            }
        }

        debug!(nodes = graph.len(), "{} frontier emptied without a win", planner);
        Err(PlanError::NoLegalFallback { planner })
    }
}

/// First action towards the lowest-cost reached node: the frontier plus the
/// node whose expansion was cut short. Losing states are skipped unless
/// nothing else was reached; ties go to the earliest candidate.
fn best_frontier_action<E: Environment>(
    env: &E,
    graph: &SearchGraph<E::State, E::Action>,
    frontier: &VecDeque<NodeId>,
    current: NodeId,
) -> Option<E::Action> {
    let candidates = || {
        frontier
            .iter()
            .copied()
            .chain(std::iter::once(current))
            .filter(|&id| id != NodeId::ROOT)
    };
    let cheapest = |include_losing: bool| {
        candidates()
            .filter(|&id| include_losing || !env.is_lose(&graph.get(id).state))
            .fold(None::<NodeId>, |best, id| match best {
                Some(b) if graph.get(b).total_cost <= graph.get(id).total_cost => Some(b),
                _ => Some(id),
            })
    };
    cheapest(false)
        .or_else(|| cheapest(true))
        .and_then(|id| graph.first_action(id))
}

impl<E: Environment> Planner<E> for UninformedGraphPlanner {
    fn name(&self) -> &'static str {
        self.planner_name()
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        check_decision_state(&*env, state)?;
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let result = self.search(env, state, &mut recorder.stats);

        let stats = recorder.finish(env.remaining());
        debug!(
            planner = self.planner_name(),
            expansions = stats.iterations,
            steps = stats.steps_used,
            exhausted = stats.exhausted,
            "graph search finished"
        );
        self.last_stats = Some(stats);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Chain, Dir, LoseFork, Side};
    use engine_core::{BudgetedEnv, Game};
    use games_maze::{layouts, Maze};

    #[test]
    fn test_chain() {
        for mut planner in [
            UninformedGraphPlanner::breadth_first(),
            UninformedGraphPlanner::depth_first(),
        ] {
            let mut env = BudgetedEnv::new(Chain, 10);
            assert_eq!(planner.choose_action(&mut env, &0), Ok(Dir::Forward));
        }
    }

    #[test]
    fn test_avoids_losing_branch() {
        for mut planner in [
            UninformedGraphPlanner::breadth_first(),
            UninformedGraphPlanner::depth_first(),
        ] {
            let mut env = BudgetedEnv::new(LoseFork, 10);
            assert_eq!(planner.choose_action(&mut env, &0), Ok(Side::Right));
        }
    }

    #[test]
    fn test_zero_budget() {
        let mut env = BudgetedEnv::new(Chain, 0);
        let mut planner = UninformedGraphPlanner::breadth_first();
        assert_eq!(
            planner.choose_action(&mut env, &0),
            Err(PlanError::NoLegalFallback { planner: "bfs" })
        );
        assert!(planner.last_stats().unwrap().exhausted);
    }

    #[test]
    fn test_exhaustion_falls_back_to_frontier() {
        // One step reaches the lose state, the second is refused
        let mut env = BudgetedEnv::new(LoseFork, 1);
        let mut planner = UninformedGraphPlanner::breadth_first();
        assert_eq!(planner.choose_action(&mut env, &0), Ok(Side::Left));

        // Both children reached; the non-losing one wins the fallback
        for mut planner in [
            UninformedGraphPlanner::breadth_first(),
            UninformedGraphPlanner::depth_first(),
        ] {
            let mut env = BudgetedEnv::new(LoseFork, 2);
            assert_eq!(planner.choose_action(&mut env, &0), Ok(Side::Right));
        }
    }

    #[test]
    fn test_terminal_state_rejected() {
        let mut env = BudgetedEnv::new(Chain, 10);
        let mut planner = UninformedGraphPlanner::depth_first();
        assert_eq!(
            planner.choose_action(&mut env, &2),
            Err(PlanError::NoLegalActions)
        );
    }

    #[test]
    fn test_unwinnable_maze_empties_frontier() {
        let maze = Maze::parse("%%%%%%\n%P %.%\n%%%%%%").unwrap();
        let start = maze.start_state();
        let mut env = BudgetedEnv::new(maze, 1000);
        let mut planner = UninformedGraphPlanner::breadth_first();

        assert_eq!(
            planner.choose_action(&mut env, &start),
            Err(PlanError::NoLegalFallback { planner: "bfs" })
        );
        assert!(!planner.last_stats().unwrap().exhausted);
    }

    #[test]
    fn test_bfs_follows_shortest_path() {
        let maze = Maze::parse(layouts::SMALL).unwrap();
        let mut state = maze.start_state();
        let shortest = maze.shortest_win(&state).unwrap();
        let mut env = BudgetedEnv::new(maze, u64::MAX);
        let mut planner = UninformedGraphPlanner::breadth_first();

        let mut moves = 0;
        while !env.game().is_win(&state) {
            env.reset_budget(u64::MAX);
            let action = planner.choose_action(&mut env, &state).unwrap();
            assert!(env.game().legal_actions(&state).contains(&action));
            state = env.apply(&state, action);
            moves += 1;
            assert!(moves <= shortest, "BFS wandered off the shortest path");
        }
        assert_eq!(moves, shortest);
    }

    #[test]
    fn test_dfs_action_is_legal_under_budget() {
        let maze = Maze::parse(layouts::MEDIUM).unwrap();
        let start = maze.start_state();
        let legal = maze.legal_actions(&start);
        let mut env = BudgetedEnv::new(maze, 25);
        let mut planner = UninformedGraphPlanner::depth_first();

        let action = planner.choose_action(&mut env, &start).unwrap();
        assert!(legal.contains(&action));
        assert_eq!(planner.last_stats().unwrap().steps_used, 25);
    }
}
