//! Random-sequence baseline: play one random sequence, answer with its head.

use engine_core::{check_decision_state, Environment, PlanError, Planner};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::sequence::{gene_alphabet, Sequence};
use crate::stats::DecisionStats;

const PLANNER: &str = "random_sequence";

/// Configuration for [`RandomSequencePlanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct RandomSequenceConfig {
    /// Actions sampled per decision.
    pub sequence_length: usize,
}

impl Default for RandomSequenceConfig {
    fn default() -> Self {
        Self {
            sequence_length: 10,
        }
    }
}

impl RandomSequenceConfig {
    pub fn with_sequence_length(mut self, length: usize) -> Self {
        self.sequence_length = length;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.sequence_length == 0 {
            return Err(PlanError::InvalidConfig(
                "sequence_length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Samples one sequence from the full action alphabet, plays it from the
/// current state until it ends, a terminal state is reached or the budget
/// runs out, and returns its first gene.
///
/// Gene repair during the playout makes the first gene legal at the decision
/// state. If not even that first step could be simulated, the decision fails
/// with `NoLegalFallback`.
#[derive(Debug)]
pub struct RandomSequencePlanner {
    config: RandomSequenceConfig,
    rng: ChaCha20Rng,
    last_stats: Option<DecisionStats>,
}

impl RandomSequencePlanner {
    /// Create a planner, rejecting invalid tunables.
    pub fn new(config: RandomSequenceConfig, seed: u64) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_stats: None,
        })
    }

    pub fn config(&self) -> &RandomSequenceConfig {
        &self.config
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }
}

impl<E: Environment> Planner<E> for RandomSequencePlanner {
    fn name(&self) -> &'static str {
        PLANNER
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let alphabet = gene_alphabet(&*env, legal);
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let mut sequence = Sequence::random(&alphabet, self.config.sequence_length, &mut self.rng);
        let sim = sequence.simulate(env, state, &mut self.rng);
        recorder.stats.iterations = 1;
        recorder.stats.exhausted = sim.exhausted;

        let result = if sim.evaluated() {
            recorder.stats.best_score = Some(sim.score);
            sequence
                .first()
                .ok_or(PlanError::NoLegalFallback { planner: PLANNER })
        } else {
            Err(PlanError::NoLegalFallback { planner: PLANNER })
        };

        trace!(steps = sim.steps, score = sim.score, "random sequence played");
        self.last_stats = Some(recorder.finish(env.remaining()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Chain, Dir};
    use engine_core::{BudgetedEnv, Game};
    use games_maze::{layouts, Maze};

    #[test]
    fn test_invalid_config_rejected() {
        let config = RandomSequenceConfig::default().with_sequence_length(0);
        assert!(matches!(
            RandomSequencePlanner::new(config, 0),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_gene_repaired_to_legal() {
        // Back is never legal at the start, whatever gets sampled
        for seed in 0..20 {
            let mut env = BudgetedEnv::new(Chain, 10);
            let mut planner =
                RandomSequencePlanner::new(RandomSequenceConfig::default(), seed).unwrap();
            assert_eq!(planner.choose_action(&mut env, &0), Ok(Dir::Forward));
        }
    }

    #[test]
    fn test_zero_budget() {
        let mut env = BudgetedEnv::new(Chain, 0);
        let mut planner = RandomSequencePlanner::new(RandomSequenceConfig::default(), 1).unwrap();
        assert_eq!(
            planner.choose_action(&mut env, &0),
            Err(PlanError::NoLegalFallback {
                planner: "random_sequence"
            })
        );
        assert!(planner.last_stats().unwrap().exhausted);
    }

    #[test]
    fn test_plays_whole_sequence_once() {
        let maze = Maze::parse(layouts::MEDIUM).unwrap();
        let start = maze.start_state();
        let legal = maze.legal_actions(&start);
        let mut env = BudgetedEnv::new(maze, 100);
        let config = RandomSequenceConfig::default().with_sequence_length(4);
        let mut planner = RandomSequencePlanner::new(config, 3).unwrap();

        let action = planner.choose_action(&mut env, &start).unwrap();
        assert!(legal.contains(&action));

        // No ghost is within four moves of the start, so all four genes run
        let stats = planner.last_stats().unwrap();
        assert_eq!(stats.steps_used, 4);
        assert_eq!(stats.iterations, 1);
        assert!(!stats.exhausted);
        assert!(stats.best_score.is_some());
    }

    #[test]
    fn test_truncated_sequence_still_answers() {
        let mut env = BudgetedEnv::new(Chain, 1);
        let mut planner = RandomSequencePlanner::new(RandomSequenceConfig::default(), 4).unwrap();
        assert_eq!(planner.choose_action(&mut env, &0), Ok(Dir::Forward));
        assert!(planner.last_stats().unwrap().exhausted);
    }
}
