//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! documentation in the repository never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    sequence: SequenceDefaults,
    evolution: EvolutionDefaults,
    mcts: MctsDefaults,
    runner: RunnerDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
    budget: u64,
    planner: String,
}

#[derive(Debug, Deserialize)]
struct SequenceDefaults {
    length: usize,
    random_length: usize,
}

#[derive(Debug, Deserialize)]
struct EvolutionDefaults {
    population_size: usize,
    crossover_rate: f64,
    mutation_rate: f64,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    rollout_depth: u32,
    exploration: f64,
    cache_states: bool,
}

#[derive(Debug, Deserialize)]
struct RunnerDefaults {
    max_turns: u32,
    maze: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}
pub fn budget() -> u64 {
    DEFAULTS.common.budget
}
pub fn planner() -> &'static str {
    &DEFAULTS.common.planner
}

// Sequence
pub fn sequence_length() -> usize {
    DEFAULTS.sequence.length
}
pub fn random_sequence_length() -> usize {
    DEFAULTS.sequence.random_length
}

// Evolution
pub fn population_size() -> usize {
    DEFAULTS.evolution.population_size
}
pub fn crossover_rate() -> f64 {
    DEFAULTS.evolution.crossover_rate
}
pub fn mutation_rate() -> f64 {
    DEFAULTS.evolution.mutation_rate
}

// MCTS
pub fn rollout_depth() -> u32 {
    DEFAULTS.mcts.rollout_depth
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn cache_states() -> bool {
    DEFAULTS.mcts.cache_states
}

// Runner
pub fn max_turns() -> u32 {
    DEFAULTS.runner.max_turns
}
pub fn maze() -> &'static str {
    &DEFAULTS.runner.maze
}
