//! Hill-climbing over fixed-length action sequences.

use engine_core::{check_decision_state, Environment, PlanError, Planner};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::sequence::{gene_alphabet, Sequence, DEFAULT_SEQUENCE_LENGTH};
use crate::stats::DecisionStats;

/// Configuration for [`LocalSearchPlanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSearchConfig {
    /// Actions per candidate sequence.
    pub sequence_length: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
        }
    }
}

impl LocalSearchConfig {
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

/// Hill-climbing planner.
///
/// Each decision seeds a random incumbent and then repeatedly proposes a
/// neighbour (every gene independently resampled on a coin flip), keeping it
/// only if it scores strictly higher. The loop stops only when a simulation
/// reports the budget exhausted, so the environment must impose a finite
/// budget. Returns the first action of the incumbent.
#[derive(Debug)]
pub struct LocalSearchPlanner {
    config: LocalSearchConfig,
    rng: ChaCha20Rng,
    last_stats: Option<DecisionStats>,
}

impl LocalSearchPlanner {
    /// Create a planner, rejecting invalid tunables.
    pub fn new(config: LocalSearchConfig, seed: u64) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_stats: None,
        })
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }

    fn climb<E: Environment>(
        &mut self,
        env: &mut E,
        state: &E::State,
        alphabet: &[E::Action],
        stats: &mut DecisionStats,
    ) -> Result<E::Action, PlanError> {
        let mut incumbent = Sequence::random(alphabet, self.config.sequence_length, &mut self.rng);
        let sim = incumbent.simulate(env, state, &mut self.rng);
        stats.iterations = 1;
        if !sim.evaluated() {
            stats.exhausted = true;
            return Err(PlanError::NoLegalFallback {
                planner: "hill_climb",
            });
        }
        let mut best_score = sim.score;
        let mut exhausted = sim.exhausted;
        stats.history.push(best_score);

        while !exhausted {
            let mut candidate = incumbent.perturb(alphabet, &mut self.rng);
            let sim = candidate.simulate(env, state, &mut self.rng);
            stats.iterations += 1;
            exhausted = sim.exhausted;

            if sim.evaluated() && sim.score > best_score {
                trace!(
                    from = best_score,
                    to = sim.score,
                    candidate = stats.iterations,
                    "hill climb improved"
                );
                best_score = sim.score;
                incumbent = candidate;
            }
            stats.history.push(best_score);
        }

        stats.exhausted = true;
        stats.best_score = Some(best_score);
        incumbent.first().ok_or(PlanError::NoLegalFallback {
            planner: "hill_climb",
        })
    }
}

impl<E: Environment> Planner<E> for LocalSearchPlanner {
    fn name(&self) -> &'static str {
        "hill_climb"
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let alphabet = gene_alphabet(&*env, legal);
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let result = self.climb(env, state, &alphabet, &mut recorder.stats);

        let stats = recorder.finish(env.remaining());
        debug!(
            candidates = stats.iterations,
            best_score = ?stats.best_score,
            steps = stats.steps_used,
            "hill climb finished"
        );
        self.last_stats = Some(stats);
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
        let config = LocalSearchConfig::default().with_sequence_length(0);
        assert!(matches!(
            LocalSearchPlanner::new(config, 0),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_chain() {
        let mut env = BudgetedEnv::new(Chain, 10);
        let mut planner = LocalSearchPlanner::new(LocalSearchConfig::default(), 1).unwrap();
        assert_eq!(planner.choose_action(&mut env, &0), Ok(Dir::Forward));
        assert_eq!(env.remaining(), 0);
    }

    #[test]
    fn test_zero_budget() {
        let mut env = BudgetedEnv::new(Chain, 0);
        let mut planner = LocalSearchPlanner::new(LocalSearchConfig::default(), 1).unwrap();
        assert_eq!(
            planner.choose_action(&mut env, &0),
            Err(PlanError::NoLegalFallback {
                planner: "hill_climb"
            })
        );
    }

    #[test]
    fn test_incumbent_never_regresses() {
        let maze = Maze::parse(layouts::SMALL).unwrap();
        let start = maze.start_state();
        let legal = maze.legal_actions(&start);
        let mut env = BudgetedEnv::new(maze, 300);
        let mut planner = LocalSearchPlanner::new(LocalSearchConfig::default(), 9).unwrap();

        let action = planner.choose_action(&mut env, &start).unwrap();
        assert!(legal.contains(&action));

        let stats = planner.last_stats().unwrap();
        assert!(stats.iterations > 10);
        assert_eq!(stats.history.len(), stats.iterations as usize);
        assert!(stats.history.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stats.best_score, stats.history.last().copied());
        assert_eq!(stats.steps_used, 300);
    }

    /// Every action always legal, every sequence scores the same.
    #[derive(Debug, Clone)]
    struct Flat;

    impl Game for Flat {
        type State = u8;
        type Action = u8;

        fn is_win(&self, _state: &u8) -> bool {
            false
        }

        fn is_lose(&self, _state: &u8) -> bool {
            false
        }

        fn legal_actions(&self, _state: &u8) -> Vec<u8> {
            vec![0, 1, 2, 3]
        }

        fn all_actions(&self) -> Vec<u8> {
            vec![0, 1, 2, 3]
        }

        fn successor(&mut self, state: &u8, _action: u8, _rng: &mut ChaCha20Rng) -> u8 {
            state.wrapping_add(1)
        }

        fn evaluate(&self, _initial: &u8, _result: &u8) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_equal_score_keeps_incumbent() {
        for seed in 0..10 {
            // The incumbent is the first thing drawn from the planner's rng
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let incumbent = Sequence::random(&Flat.all_actions(), 5, &mut rng);

            let mut env = BudgetedEnv::new(Flat, 100);
            let mut planner = LocalSearchPlanner::new(LocalSearchConfig::default(), seed).unwrap();
            assert_eq!(planner.choose_action(&mut env, &0).ok(), incumbent.first());

            let stats = planner.last_stats().unwrap();
            assert_eq!(stats.iterations, 21);
            assert!(stats.history.iter().all(|&score| score == 1.0));
            assert_eq!(stats.best_score, Some(1.0));
        }
    }

    #[test]
    fn test_stats_cover_one_decision() {
        let mut env = BudgetedEnv::new(Chain, 10);
        let mut planner = LocalSearchPlanner::new(LocalSearchConfig::default(), 2).unwrap();
        planner.choose_action(&mut env, &0).unwrap();
        let first = planner.last_stats().unwrap().clone();

        env.reset_budget(10);
        planner.choose_action(&mut env, &1).unwrap();
        let second = planner.last_stats().unwrap();
        assert_eq!(first.steps_used, 10);
        assert_eq!(second.steps_used, 10);
    }
}
