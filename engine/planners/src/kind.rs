//! Build any planner by name.

use std::fmt;
use std::str::FromStr;

use engine_core::{Environment, PlanError, Planner};
use mcts::{MctsConfig, MctsPlanner};
use thiserror::Error;

use crate::evolution::{EvolutionConfig, EvolutionaryPlanner};
use crate::graph::informed::InformedGraphPlanner;
use crate::graph::uninformed::UninformedGraphPlanner;
use crate::local_search::{LocalSearchConfig, LocalSearchPlanner};
use crate::lookahead::OneStepLookaheadPlanner;
use crate::random::RandomPlanner;
use crate::random_sequence::{RandomSequenceConfig, RandomSequencePlanner};

/// Error returned when parsing an unknown planner name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown planner '{0}' (expected one of: random, random_sequence, lookahead, hill_climb, genetic, mcts, bfs, dfs, astar)")]
pub struct UnknownPlanner(pub String);

/// Every planning strategy the engine provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannerKind {
    Random,
    RandomSequence,
    OneStepLookahead,
    LocalSearch,
    Evolution,
    Mcts,
    Bfs,
    Dfs,
    AStar,
}

impl PlannerKind {
    pub const ALL: [PlannerKind; 9] = [
        PlannerKind::Random,
        PlannerKind::RandomSequence,
        PlannerKind::OneStepLookahead,
        PlannerKind::LocalSearch,
        PlannerKind::Evolution,
        PlannerKind::Mcts,
        PlannerKind::Bfs,
        PlannerKind::Dfs,
        PlannerKind::AStar,
    ];

    /// Canonical name, as accepted by `FromStr` and used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            PlannerKind::Random => "random",
            PlannerKind::RandomSequence => "random_sequence",
            PlannerKind::OneStepLookahead => "lookahead",
            PlannerKind::LocalSearch => "hill_climb",
            PlannerKind::Evolution => "genetic",
            PlannerKind::Mcts => "mcts",
            PlannerKind::Bfs => "bfs",
            PlannerKind::Dfs => "dfs",
            PlannerKind::AStar => "astar",
        }
    }
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlannerKind {
    type Err = UnknownPlanner;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "random" => Ok(PlannerKind::Random),
            "random_sequence" | "random_seq" => Ok(PlannerKind::RandomSequence),
            "lookahead" | "one_step_lookahead" => Ok(PlannerKind::OneStepLookahead),
            "hill_climb" | "local_search" => Ok(PlannerKind::LocalSearch),
            "genetic" | "evolution" => Ok(PlannerKind::Evolution),
            "mcts" => Ok(PlannerKind::Mcts),
            "bfs" => Ok(PlannerKind::Bfs),
            "dfs" => Ok(PlannerKind::Dfs),
            "astar" | "a_star" | "a*" => Ok(PlannerKind::AStar),
            _ => Err(UnknownPlanner(s.to_string())),
        }
    }
}

/// Tunables for every planner, one set per process.
#[derive(Debug, Clone, Default)]
pub struct PlannerSettings {
    /// Seed for the planner's own RNG.
    pub seed: u64,
    pub random_sequence: RandomSequenceConfig,
    pub local_search: LocalSearchConfig,
    pub evolution: EvolutionConfig,
    pub mcts: MctsConfig,
}

/// Construct the planner for `kind`. Invalid tunables are rejected here,
/// before any search runs.
pub fn build_planner<E: Environment>(
    kind: PlannerKind,
    settings: &PlannerSettings,
) -> Result<Box<dyn Planner<E>>, PlanError> {
    let seed = settings.seed;
    let planner: Box<dyn Planner<E>> = match kind {
        PlannerKind::Random => Box::new(RandomPlanner::new(seed)),
        PlannerKind::RandomSequence => Box::new(RandomSequencePlanner::new(
            settings.random_sequence.clone(),
            seed,
        )?),
        PlannerKind::OneStepLookahead => Box::new(OneStepLookaheadPlanner::new(seed)),
        PlannerKind::LocalSearch => Box::new(LocalSearchPlanner::new(
            settings.local_search.clone(),
            seed,
        )?),
        PlannerKind::Evolution => Box::new(EvolutionaryPlanner::new(
            settings.evolution.clone(),
            seed,
        )?),
        PlannerKind::Mcts => Box::new(MctsPlanner::new(settings.mcts.clone(), seed)?),
        PlannerKind::Bfs => Box::new(UninformedGraphPlanner::breadth_first()),
        PlannerKind::Dfs => Box::new(UninformedGraphPlanner::depth_first()),
        PlannerKind::AStar => Box::new(InformedGraphPlanner::new()),
    };
    Ok(planner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Chain;
    use engine_core::BudgetedEnv;

    #[test]
    fn test_parse_names() {
        for kind in PlannerKind::ALL {
            assert_eq!(kind.as_str().parse::<PlannerKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!("A-Star".parse::<PlannerKind>(), Ok(PlannerKind::AStar));
        assert_eq!(" Local_Search ".parse::<PlannerKind>(), Ok(PlannerKind::LocalSearch));
        assert_eq!(
            "random-sequence".parse::<PlannerKind>(),
            Ok(PlannerKind::RandomSequence)
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = "greedy".parse::<PlannerKind>().unwrap_err();
        assert_eq!(err, UnknownPlanner("greedy".to_string()));
        assert!(err.to_string().contains("greedy"));
    }

    #[test]
    fn test_built_planner_names_match_kind() {
        let settings = PlannerSettings::default();
        for kind in PlannerKind::ALL {
            let planner = build_planner::<BudgetedEnv<Chain>>(kind, &settings).unwrap();
            assert_eq!(planner.name(), kind.as_str());
        }
    }

    #[test]
    fn test_invalid_settings_rejected_at_build() {
        let settings = PlannerSettings {
            evolution: EvolutionConfig::default().with_population_size(3),
            ..PlannerSettings::default()
        };
        assert!(matches!(
            build_planner::<BudgetedEnv<Chain>>(PlannerKind::Evolution, &settings),
            Err(PlanError::InvalidConfig(_))
        ));

        let settings = PlannerSettings {
            mcts: MctsConfig::default().with_rollout_depth(0),
            ..PlannerSettings::default()
        };
        assert!(matches!(
            build_planner::<BudgetedEnv<Chain>>(PlannerKind::Mcts, &settings),
            Err(PlanError::InvalidConfig(_))
        ));
    }
}
