//! Planner contract and the error taxonomy shared by every strategy.
//!
//! Running out of budget is not an error: each planner recovers locally and
//! reports its best answer so far. Only two conditions reach the caller, a
//! decision where nothing was ever simulated and invalid tunables.

use thiserror::Error;

use crate::environment::Environment;

/// Errors surfaced by planners.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The budget ran out before any candidate or node produced an action.
    #[error("{planner}: budget exhausted before any action could be evaluated")]
    NoLegalFallback { planner: &'static str },

    /// The decision state is terminal or offers no legal action.
    #[error("No legal actions available")]
    NoLegalActions,

    /// A tunable was rejected at construction time.
    #[error("Invalid planner configuration: {0}")]
    InvalidConfig(String),
}

/// One-shot decision strategy.
///
/// Called once per decision with the real current state. Implementations keep
/// no search state between calls and must return a legal action whenever at
/// least one `step` succeeded.
pub trait Planner<E: Environment> {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Choose the action to take from `state`.
    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError>;
}

impl<E: Environment, P: Planner<E> + ?Sized> Planner<E> for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        (**self).choose_action(env, state)
    }
}

/// Reject decisions from states that offer nothing to plan over.
///
/// Returns the legal actions at `state` when planning can proceed.
pub fn check_decision_state<E: Environment>(
    env: &E,
    state: &E::State,
) -> Result<Vec<E::Action>, PlanError> {
    if env.is_terminal(state) {
        return Err(PlanError::NoLegalActions);
    }
    let legal = env.legal_actions(state);
    if legal.is_empty() {
        return Err(PlanError::NoLegalActions);
    }
    Ok(legal)
}
