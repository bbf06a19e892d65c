//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "PLANNER_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Failure to load a config file the caller asked for explicitly.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the PLANNER_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path, falling back to defaults when
/// the file cannot be read or parsed.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match try_load_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Load configuration from a specific path, reporting read and parse errors.
pub fn try_load_from_path(path: &Path) -> Result<CentralConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(apply_env_overrides(config))
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u64, f64, bool, etc.). Unparseable values are ignored.
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={:?}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: PLANNER_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "PLANNER_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "PLANNER_COMMON_SEED", parse);
    env_override!(config, common.budget, "PLANNER_COMMON_BUDGET", parse);
    env_override!(config, common.planner, "PLANNER_COMMON_PLANNER");

    // Sequence
    env_override!(config, sequence.length, "PLANNER_SEQUENCE_LENGTH", parse);
    env_override!(
        config,
        sequence.random_length,
        "PLANNER_SEQUENCE_RANDOM_LENGTH",
        parse
    );

    // Evolution
    env_override!(
        config,
        evolution.population_size,
        "PLANNER_EVOLUTION_POPULATION_SIZE",
        parse
    );
    env_override!(
        config,
        evolution.crossover_rate,
        "PLANNER_EVOLUTION_CROSSOVER_RATE",
        parse
    );
    env_override!(
        config,
        evolution.mutation_rate,
        "PLANNER_EVOLUTION_MUTATION_RATE",
        parse
    );

    // MCTS
    env_override!(
        config,
        mcts.rollout_depth,
        "PLANNER_MCTS_ROLLOUT_DEPTH",
        parse
    );
    env_override!(config, mcts.exploration, "PLANNER_MCTS_EXPLORATION", parse);
    env_override!(
        config,
        mcts.cache_states,
        "PLANNER_MCTS_CACHE_STATES",
        parse
    );

    // Runner
    env_override!(config, runner.max_turns, "PLANNER_RUNNER_MAX_TURNS", parse);
    env_override!(config, runner.maze, "PLANNER_RUNNER_MAZE");

    config
}
