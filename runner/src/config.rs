//! Configuration for the runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use planners::{
    EvolutionConfig, LocalSearchConfig, PlannerKind, PlannerSettings, RandomSequenceConfig,
};
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_planner() -> String {
    CENTRAL_CONFIG.common.planner.clone()
}

fn default_budget() -> u64 {
    CENTRAL_CONFIG.common.budget
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_maze() -> String {
    CENTRAL_CONFIG.runner.maze.clone()
}

fn default_max_turns() -> u32 {
    CENTRAL_CONFIG.runner.max_turns
}

fn default_episodes() -> u32 {
    1
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "runner")]
#[command(about = "Plays maze episodes with a budget-limited planner")]
#[command(
    long_about = "Runs one or more maze episodes. Before every move the chosen planner
gets a fresh step budget and must answer with a legal action.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Planner (random, random_sequence, lookahead, hill_climb, genetic, mcts, bfs, dfs, astar)
    #[arg(long, default_value_t = default_planner())]
    pub planner: String,

    /// Steps available for each decision
    #[arg(long, default_value_t = default_budget())]
    pub budget: u64,

    /// Seed for the planner and the environment
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Built-in layout name (tiny, small, medium) or path to a layout file
    #[arg(long, default_value_t = default_maze())]
    pub maze: String,

    /// Turn limit per episode
    #[arg(long, default_value_t = default_max_turns())]
    pub max_turns: u32,

    /// Number of episodes to play
    #[arg(long, default_value_t = default_episodes())]
    pub episodes: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.planner_kind()?;

        if self.maze.is_empty() {
            return Err(anyhow!("maze cannot be empty"));
        }

        if self.max_turns == 0 {
            return Err(anyhow!("max_turns must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn planner_kind(&self) -> Result<PlannerKind> {
        Ok(self.planner.parse::<PlannerKind>()?)
    }

    /// Planner tunables from the loaded configuration, seeded from the CLI.
    pub fn planner_settings(&self) -> PlannerSettings {
        settings_from(&CENTRAL_CONFIG, self.seed)
    }
}

/// Convert the file/env configuration into planner tunables. Range checks
/// happen later, when the planner is built.
pub fn settings_from(config: &CentralConfig, seed: u64) -> PlannerSettings {
    PlannerSettings {
        seed,
        random_sequence: RandomSequenceConfig::default()
            .with_sequence_length(config.sequence.random_length),
        local_search: LocalSearchConfig::default().with_sequence_length(config.sequence.length),
        evolution: EvolutionConfig::default()
            .with_sequence_length(config.sequence.length)
            .with_population_size(config.evolution.population_size)
            .with_crossover_rate(config.evolution.crossover_rate)
            .with_mutation_rate(config.evolution.mutation_rate),
        mcts: MctsConfig::default()
            .with_rollout_depth(config.mcts.rollout_depth)
            .with_exploration(config.mcts.exploration)
            .with_cache_states(config.mcts.cache_states),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            planner: "astar".into(),
            budget: 100,
            seed: 3,
            maze: "tiny".into(),
            max_turns: 50,
            episodes: 1,
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
        assert_eq!(base_config().planner_kind().unwrap(), PlannerKind::AStar);
    }

    #[test]
    fn test_unknown_planner_rejected() {
        let mut config = base_config();
        config.planner = "greedy".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("greedy"));
    }

    #[test]
    fn test_zero_turns_rejected() {
        let mut config = base_config();
        config.max_turns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = base_config();
        config.log_level = "loud".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let config = Config::parse_from([
            "runner",
            "--planner",
            "bfs",
            "--budget",
            "7",
            "--maze",
            "medium",
        ]);
        assert_eq!(config.planner, "bfs");
        assert_eq!(config.budget, 7);
        assert_eq!(config.maze, "medium");
    }

    #[test]
    fn test_settings_follow_config_sections() {
        let mut central = CentralConfig::default();
        central.sequence.length = 9;
        central.sequence.random_length = 3;
        central.evolution.population_size = 12;
        central.mcts.cache_states = false;

        let settings = settings_from(&central, 11);
        assert_eq!(settings.seed, 11);
        assert_eq!(settings.random_sequence.sequence_length, 3);
        assert_eq!(settings.local_search.sequence_length, 9);
        assert_eq!(settings.evolution.sequence_length, 9);
        assert_eq!(settings.evolution.population_size, 12);
        assert!(!settings.mcts.cache_states);
    }
}
