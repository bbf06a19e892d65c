//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the runner binary and the planner benchmarks.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`PLANNER_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! Command-line flags in the runner sit above all three.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! PLANNER_<SECTION>_<KEY>=value
//!
//! Examples:
//!     PLANNER_COMMON_PLANNER=astar
//!     PLANNER_COMMON_BUDGET=500
//!     PLANNER_EVOLUTION_POPULATION_SIZE=16
//!     PLANNER_MCTS_CACHE_STATES=false
//!     PLANNER_RUNNER_MAZE=medium
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, try_load_from_path, ConfigError,
    CONFIG_PATH_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
