//! Core traits and types for budget-limited decision-time planning
//!
//! This crate provides the fundamental abstractions every planner is written against:
//! - `Game`: Typed, unmetered rules of an environment (transitions, terminal tests, scoring)
//! - `Environment`: The metered port planners drive, where every `step` spends budget
//! - `Budget`: Per-decision counter of remaining simulation calls
//! - `BudgetedEnv`: Adapter turning any `Game` into a metered `Environment`
//! - `Planner`: One-shot "choose an action" contract plus the shared error taxonomy

pub mod adapter;
pub mod budget;
pub mod environment;
pub mod planner;
pub mod typed;

// Re-export main types for convenience
pub use adapter::BudgetedEnv;
pub use budget::Budget;
pub use environment::{Environment, Outcome};
pub use planner::{check_decision_state, PlanError, Planner};
pub use typed::Game;
