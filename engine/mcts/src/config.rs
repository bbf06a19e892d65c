//! MCTS configuration parameters.

use engine_core::PlanError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Maximum number of random plies taken by each rollout.
    pub rollout_depth: u32,

    /// Constant inside the UCB1 exploration term:
    /// `mean + sqrt(exploration * ln(N_parent) / N_child)`.
    /// Classic UCB1 uses 2.0.
    pub exploration: f64,

    /// Cache each node's state when it is created.
    /// When false, expansion rebuilds the parent's state by replaying the
    /// action path from the root, spending one step per edge.
    pub cache_states: bool,

    /// Consecutive iterations allowed without spending budget before the
    /// search is considered converged. Iterations that end on an already
    /// known terminal node cost nothing, so this bounds the loop when the
    /// best lines are all solved.
    pub max_idle_iterations: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            rollout_depth: 5,
            exploration: 2.0,
            cache_states: true,
            max_idle_iterations: 1000,
        }
    }
}

impl MctsConfig {
    /// Config that reproduces path-replay budget consumption.
    pub fn with_replay() -> Self {
        Self {
            cache_states: false,
            ..Self::default()
        }
    }

    /// Builder pattern: set rollout depth.
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: toggle state caching.
    pub fn with_cache_states(mut self, cache: bool) -> Self {
        self.cache_states = cache;
        self
    }

    /// Builder pattern: set the idle-iteration limit.
    pub fn with_max_idle_iterations(mut self, n: u32) -> Self {
        self.max_idle_iterations = n;
        self
    }

    /// Reject tunables that would make the search meaningless.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.rollout_depth == 0 {
            return Err(PlanError::InvalidConfig(
                "rollout_depth must be > 0".to_string(),
            ));
        }
        if self.max_idle_iterations == 0 {
            return Err(PlanError::InvalidConfig(
                "max_idle_iterations must be > 0".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}
