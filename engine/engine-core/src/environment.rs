//! The metered environment port planners drive.
//!
//! Planners never construct or mutate states themselves; every transition goes
//! through [`Environment::step`], which spends one unit of the shared budget
//! and reports exhaustion as a typed [`Outcome`] rather than an error.

use std::fmt::Debug;
use std::hash::Hash;

/// Result of a metered transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S> {
    /// The step was simulated; holds the resulting state.
    Continue(S),
    /// The budget is spent. Holds the state the refused step was attempted from.
    Exhausted(S),
}

impl<S> Outcome<S> {
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Outcome::Exhausted(_))
    }

    /// The state reached if the step succeeded.
    pub fn continued(self) -> Option<S> {
        match self {
            Outcome::Continue(state) => Some(state),
            Outcome::Exhausted(_) => None,
        }
    }

    /// The last state actually reached, whether or not the step succeeded.
    pub fn into_state(self) -> S {
        match self {
            Outcome::Continue(state) | Outcome::Exhausted(state) => state,
        }
    }
}

/// Environment port consumed by every planner.
///
/// All queries are free; only `step` consumes budget. Once a `step` returns
/// `Outcome::Exhausted`, every later `step` in the same decision does too.
pub trait Environment {
    type State: Clone + Eq + Hash + Debug;
    type Action: Copy + Eq + Hash + Debug;

    fn is_win(&self, state: &Self::State) -> bool;

    fn is_lose(&self, state: &Self::State) -> bool;

    /// Ordered legal actions; non-empty unless the state is terminal.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Fixed action alphabet used for sampling genes and mutations.
    fn all_actions(&self) -> Vec<Self::Action>;

    /// Advance one ply, spending exactly one unit of budget.
    fn step(&mut self, state: &Self::State, action: Self::Action) -> Outcome<Self::State>;

    /// Scoring oracle, higher is better.
    fn evaluate(&self, initial: &Self::State, result: &Self::State) -> f64;

    /// Remaining-cost estimate for informed search.
    fn heuristic(&self, state: &Self::State) -> f64;

    /// Steps still available in the current decision.
    fn remaining(&self) -> u64;

    fn is_terminal(&self, state: &Self::State) -> bool {
        self.is_win(state) || self.is_lose(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<u32> = Outcome::Continue(3);
        assert!(!ok.is_exhausted());
        assert_eq!(ok.clone().continued(), Some(3));
        assert_eq!(ok.into_state(), 3);

        let spent: Outcome<u32> = Outcome::Exhausted(1);
        assert!(spent.is_exhausted());
        assert_eq!(spent.clone().continued(), None);
        assert_eq!(spent.into_state(), 1);
    }
}
