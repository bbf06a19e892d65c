//! Budget-limited Monte Carlo Tree Search (MCTS) planner.
//!
//! This crate provides a game-agnostic MCTS planner that works with any
//! environment implementing the `engine-core` Environment trait.
//!
//! # Overview
//!
//! Each decision builds a fresh tree rooted at the current state and runs
//! iterations until a simulation step reports the budget exhausted:
//!
//! 1. **Selection**: Descend with UCB1 (`mean + sqrt(2 ln N / n)`), breaking
//!    ties uniformly at random
//! 2. **Expansion**: Pop one untried legal action and create its child
//! 3. **Simulation**: Random rollout of at most `rollout_depth` plies, scored
//!    with the environment's evaluation against the root state
//! 4. **Backpropagation**: Add the reward and one visit to every node on the
//!    path back to the root
//!
//! The most-visited root child wins. If the budget runs out before the root
//! gets a single child, the planner reports `PlanError::NoLegalFallback`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::{BudgetedEnv, Planner};
//! use games_maze::Maze;
//! use mcts::{MctsConfig, MctsPlanner};
//!
//! let maze = Maze::parse("%%%%%\n%P .%\n%%%%%").unwrap();
//! let start = maze.start_state();
//! let mut env = BudgetedEnv::new(maze, 200);
//!
//! let mut planner = MctsPlanner::new(MctsConfig::default(), 42).unwrap();
//! let action = planner.choose_action(&mut env, &start).unwrap();
//! println!("Best action: {:?}", action);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `rollout_depth`: Random plies per rollout (default: 5)
//! - `exploration`: Constant inside the UCB1 bonus (default: 2.0)
//! - `cache_states`: Store each node's state (default) or replay the action
//!   path from the root on every expansion
//! - `max_idle_iterations`: Stop once this many iterations in a row spent no budget

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsPlanner, MctsSearch, SearchStats};
pub use tree::{MctsTree, TreeStats};
