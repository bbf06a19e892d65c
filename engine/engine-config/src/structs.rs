//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_budget() -> u64 {
    defaults::budget()
}
fn d_planner() -> String {
    defaults::planner().into()
}
fn d_length() -> usize {
    defaults::sequence_length()
}
fn d_random_length() -> usize {
    defaults::random_sequence_length()
}
fn d_population_size() -> usize {
    defaults::population_size()
}
fn d_crossover_rate() -> f64 {
    defaults::crossover_rate()
}
fn d_mutation_rate() -> f64 {
    defaults::mutation_rate()
}
fn d_rollout_depth() -> u32 {
    defaults::rollout_depth()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_cache_states() -> bool {
    defaults::cache_states()
}
fn d_max_turns() -> u32 {
    defaults::max_turns()
}
fn d_maze() -> String {
    defaults::maze().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Settings shared by every planner
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Seed for the planner's RNG
    #[serde(default = "d_seed")]
    pub seed: u64,
    /// Steps available for each decision
    #[serde(default = "d_budget")]
    pub budget: u64,
    /// Planner name
    #[serde(default = "d_planner")]
    pub planner: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
            budget: defaults::budget(),
            planner: defaults::planner().into(),
        }
    }
}

/// Candidate sequence settings (hill climbing and genetic planners)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SequenceConfig {
    #[serde(default = "d_length")]
    pub length: usize,
    /// Length of the single sequence the random_sequence planner plays
    #[serde(default = "d_random_length")]
    pub random_length: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            length: defaults::sequence_length(),
            random_length: defaults::random_sequence_length(),
        }
    }
}

/// Genetic planner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    #[serde(default = "d_population_size")]
    pub population_size: usize,
    #[serde(default = "d_crossover_rate")]
    pub crossover_rate: f64,
    #[serde(default = "d_mutation_rate")]
    pub mutation_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: defaults::population_size(),
            crossover_rate: defaults::crossover_rate(),
            mutation_rate: defaults::mutation_rate(),
        }
    }
}

/// MCTS settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_rollout_depth")]
    pub rollout_depth: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_cache_states")]
    pub cache_states: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            rollout_depth: defaults::rollout_depth(),
            exploration: defaults::exploration(),
            cache_states: defaults::cache_states(),
        }
    }
}

/// Episode runner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    /// Turn limit per episode
    #[serde(default = "d_max_turns")]
    pub max_turns: u32,
    /// Built-in layout name or path to a layout file
    #[serde(default = "d_maze")]
    pub maze: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_turns: defaults::max_turns(),
            maze: defaults::maze().into(),
        }
    }
}
