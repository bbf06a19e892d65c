//! Greedy one-step lookahead on the heuristic.

use engine_core::{check_decision_state, Environment, Outcome, PlanError, Planner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::stats::DecisionStats;

/// Heuristic values closer than this are treated as equal.
const TIE_EPSILON: f64 = 1e-9;

/// Steps each legal action once and keeps the successors with the lowest
/// heuristic, choosing among them uniformly at random.
///
/// Losing successors rank behind every other successor. If the budget runs
/// out part way, the choice is made among the successors scored so far.
#[derive(Debug)]
pub struct OneStepLookaheadPlanner {
    rng: ChaCha20Rng,
    last_stats: Option<DecisionStats>,
}

impl OneStepLookaheadPlanner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_stats: None,
        }
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }
}

impl<E: Environment> Planner<E> for OneStepLookaheadPlanner {
    fn name(&self) -> &'static str {
        "lookahead"
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let mut scored = Vec::with_capacity(legal.len());
        for action in legal {
            match env.step(state, action) {
                Outcome::Continue(next) => {
                    let score = if env.is_lose(&next) {
                        f64::INFINITY
                    } else {
                        env.heuristic(&next)
                    };
                    scored.push((action, score));
                }
                Outcome::Exhausted(_) => {
                    recorder.stats.exhausted = true;
                    break;
                }
            }
        }
        recorder.stats.iterations = scored.len() as u32;

        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .fold(f64::INFINITY, f64::min);
        let ties: Vec<E::Action> = scored
            .iter()
            .filter(|&&(_, score)| score == best || (score - best).abs() <= TIE_EPSILON)
            .map(|&(action, _)| action)
            .collect();

        let result = if ties.is_empty() {
            Err(PlanError::NoLegalFallback {
                planner: "lookahead",
            })
        } else {
            recorder.stats.best_score = Some(best);
            Ok(ties[self.rng.gen_range(0..ties.len())])
        };

        let stats = recorder.finish(env.remaining());
        debug!(
            scored = stats.iterations,
            ties = ties.len(),
            best,
            exhausted = stats.exhausted,
            "lookahead finished"
        );
        self.last_stats = Some(stats);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Chain, Dir, LoseFork, Side};
    use engine_core::BudgetedEnv;
    use games_maze::{Maze, Move};

    #[test]
    fn test_prefers_lowest_heuristic() {
        // Eating the pellet to the east leaves nothing to eat
        let maze = Maze::parse("%%%%%\n% P.%\n%%%%%").unwrap();
        let start = maze.start_state();
        let mut env = BudgetedEnv::new(maze, 10);
        let mut planner = OneStepLookaheadPlanner::new(3);

        assert_eq!(planner.choose_action(&mut env, &start), Ok(Move::East));
        assert_eq!(planner.last_stats().unwrap().best_score, Some(0.0));
        assert_eq!(planner.last_stats().unwrap().steps_used, 3);
    }

    #[test]
    fn test_losing_successor_ranks_last() {
        let mut env = BudgetedEnv::new(LoseFork, 10);
        let mut planner = OneStepLookaheadPlanner::new(0);
        for _ in 0..20 {
            assert_eq!(planner.choose_action(&mut env, &0), Ok(Side::Right));
        }
    }

    #[test]
    fn test_partial_scan_on_exhaustion() {
        let mut env = BudgetedEnv::new(LoseFork, 1);
        let mut planner = OneStepLookaheadPlanner::new(0);
        // Only the losing successor was scored
        assert_eq!(planner.choose_action(&mut env, &0), Ok(Side::Left));
        assert!(planner.last_stats().unwrap().exhausted);
    }

    #[test]
    fn test_zero_budget() {
        let mut env = BudgetedEnv::new(Chain, 0);
        let mut planner = OneStepLookaheadPlanner::new(0);
        assert_eq!(
            planner.choose_action(&mut env, &0),
            Err(PlanError::NoLegalFallback { planner: "lookahead" })
        );
        let mut env = BudgetedEnv::new(Chain, 1);
        assert_eq!(planner.choose_action(&mut env, &0), Ok(Dir::Forward));
    }
}
