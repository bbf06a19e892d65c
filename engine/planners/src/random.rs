//! Uniform random baseline.

use engine_core::{check_decision_state, Environment, Outcome, PlanError, Planner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::stats::DecisionStats;

/// Picks a uniformly random legal action and simulates it for one step.
///
/// A decision in which that single step could not be simulated fails with
/// `NoLegalFallback`, like every other planner.
#[derive(Debug)]
pub struct RandomPlanner {
    rng: ChaCha20Rng,
    last_stats: Option<DecisionStats>,
}

impl RandomPlanner {
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

impl<E: Environment> Planner<E> for RandomPlanner {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let mut recorder = DecisionStats::starting_at(env.remaining());
        let action = legal[self.rng.gen_range(0..legal.len())];

        let result = match env.step(state, action) {
            Outcome::Continue(_) => {
                recorder.stats.iterations = 1;
                Ok(action)
            }
            Outcome::Exhausted(_) => {
                recorder.stats.exhausted = true;
                Err(PlanError::NoLegalFallback { planner: "random" })
            }
        };

        trace!(?action, ok = result.is_ok(), "random choice");
        self.last_stats = Some(recorder.finish(env.remaining()));
        result
    }
}
