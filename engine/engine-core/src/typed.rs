//! Typed Game trait describing the unmetered rules of an environment
//!
//! Game implementations work with strongly-typed state and action values. The
//! trait carries no notion of a simulation budget: metering is added by
//! [`BudgetedEnv`](crate::adapter::BudgetedEnv), which is what planners drive.

use std::fmt::Debug;
use std::hash::Hash;

use rand_chacha::ChaCha20Rng;

/// Main trait for environment implementations
///
/// # Type Parameters
///
/// * `State` - Opaque game state. Equality and hashing are decided by the game
///   and are what graph search uses to deduplicate states.
/// * `Action` - Small value from a fixed alphabet, compared by identity
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::Game;
/// # use rand_chacha::ChaCha20Rng;
/// #[derive(Debug)]
/// struct Counter;
///
/// impl Game for Counter {
///     type State = u8;
///     type Action = bool;
///
///     fn is_win(&self, state: &u8) -> bool { *state == 3 }
///     fn is_lose(&self, _state: &u8) -> bool { false }
///     fn legal_actions(&self, _state: &u8) -> Vec<bool> { vec![false, true] }
///     fn all_actions(&self) -> Vec<bool> { vec![false, true] }
///     fn successor(&mut self, state: &u8, up: bool, _rng: &mut ChaCha20Rng) -> u8 {
///         if up { state + 1 } else { *state }
///     }
///     fn evaluate(&self, initial: &u8, result: &u8) -> f64 {
///         f64::from(*result) - f64::from(*initial)
///     }
/// }
/// ```
pub trait Game: Debug {
    /// Game state type - compared and hashed for deduplication
    type State: Clone + Eq + Hash + Debug;

    /// Action type - small and Copy
    type Action: Copy + Eq + Hash + Debug;

    /// Whether the state is a terminal win. Mutually exclusive with `is_lose`.
    fn is_win(&self, state: &Self::State) -> bool;

    /// Whether the state is a terminal loss. Mutually exclusive with `is_win`.
    fn is_lose(&self, state: &Self::State) -> bool;

    /// Legal actions at `state`, in a stable order.
    ///
    /// Non-empty unless the state is terminal.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The fixed alphabet of actions, independent of legality at any state.
    ///
    /// Sequence planners sample genes and mutations from this set.
    fn all_actions(&self) -> Vec<Self::Action>;

    /// Advance `state` by one ply.
    ///
    /// # Arguments
    ///
    /// * `state` - State the action is applied to
    /// * `action` - Action to take
    /// * `rng` - Random number generator for stochastic elements (opponents, spawns)
    fn successor(
        &mut self,
        state: &Self::State,
        action: Self::Action,
        rng: &mut ChaCha20Rng,
    ) -> Self::State;

    /// Desirability of `result` relative to `initial`; higher is better.
    ///
    /// No contract on scale beyond monotonicity.
    fn evaluate(&self, initial: &Self::State, result: &Self::State) -> f64;

    /// Estimated remaining cost from `state` to a win, used by graph search.
    ///
    /// The default of zero turns A* into uniform-cost search.
    fn heuristic(&self, _state: &Self::State) -> f64 {
        0.0
    }

    /// Whether the state ends the episode.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.is_win(state) || self.is_lose(state)
    }
}
