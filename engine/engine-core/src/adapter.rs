//! Adapter layer metering a typed game into the environment port
//!
//! This module provides `BudgetedEnv`, which wraps any typed `Game` and exposes
//! the `Environment` interface: queries are forwarded untouched, while every
//! `step` first spends one unit of the decision's `Budget`.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::budget::Budget;
use crate::environment::{Environment, Outcome};
use crate::typed::Game;

/// Adapter that meters a typed game with a per-decision budget
///
/// The adapter owns the RNG passed to `Game::successor`, so stochastic games
/// stay reproducible for a given seed.
///
/// # Example
///
/// ```rust
/// # use engine_core::{BudgetedEnv, Environment, Game, Outcome};
/// # use rand_chacha::ChaCha20Rng;
/// # #[derive(Debug)]
/// # struct Counter;
/// # impl Game for Counter {
/// #     type State = u8;
/// #     type Action = bool;
/// #     fn is_win(&self, state: &u8) -> bool { *state == 3 }
/// #     fn is_lose(&self, _state: &u8) -> bool { false }
/// #     fn legal_actions(&self, _state: &u8) -> Vec<bool> { vec![true] }
/// #     fn all_actions(&self) -> Vec<bool> { vec![false, true] }
/// #     fn successor(&mut self, state: &u8, _a: bool, _rng: &mut ChaCha20Rng) -> u8 { state + 1 }
/// #     fn evaluate(&self, _i: &u8, r: &u8) -> f64 { f64::from(*r) }
/// # }
/// let mut env = BudgetedEnv::new(Counter, 1);
/// assert_eq!(env.step(&0, true), Outcome::Continue(1));
/// assert_eq!(env.step(&1, true), Outcome::Exhausted(1));
///
/// // A new decision starts with a fresh budget
/// env.reset_budget(5);
/// assert_eq!(env.remaining(), 5);
/// ```
#[derive(Debug)]
pub struct BudgetedEnv<G: Game> {
    game: G,
    budget: Budget,
    rng: ChaCha20Rng,
}

impl<G: Game> BudgetedEnv<G> {
    /// Create a new adapter with `limit` steps available for the first decision.
    pub fn new(game: G, limit: u64) -> Self {
        Self::with_seed(game, limit, 0)
    }

    /// Create a new adapter whose transition RNG is seeded with `seed`.
    pub fn with_seed(game: G, limit: u64, seed: u64) -> Self {
        Self {
            game,
            budget: Budget::new(limit),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Start a new decision with `limit` steps.
    pub fn reset_budget(&mut self, limit: u64) {
        self.budget = Budget::new(limit);
    }

    /// Budget of the current decision.
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Apply an action outside of any planning budget (the real move).
    pub fn apply(&mut self, state: &G::State, action: G::Action) -> G::State {
        self.game.successor(state, action, &mut self.rng)
    }

    /// Get a reference to the underlying game
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get a mutable reference to the underlying game
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Consume the adapter and return the underlying game
    pub fn into_inner(self) -> G {
        self.game
    }
}

impl<G: Game> Environment for BudgetedEnv<G> {
    type State = G::State;
    type Action = G::Action;

    fn is_win(&self, state: &G::State) -> bool {
        self.game.is_win(state)
    }

    fn is_lose(&self, state: &G::State) -> bool {
        self.game.is_lose(state)
    }

    fn legal_actions(&self, state: &G::State) -> Vec<G::Action> {
        self.game.legal_actions(state)
    }

    fn all_actions(&self) -> Vec<G::Action> {
        self.game.all_actions()
    }

    fn step(&mut self, state: &G::State, action: G::Action) -> Outcome<G::State> {
        if !self.budget.try_consume() {
            trace!(used = self.budget.used(), "step refused, budget exhausted");
            return Outcome::Exhausted(state.clone());
        }
        Outcome::Continue(self.game.successor(state, action, &mut self.rng))
    }

    fn evaluate(&self, initial: &G::State, result: &G::State) -> f64 {
        self.game.evaluate(initial, result)
    }

    fn heuristic(&self, state: &G::State) -> f64 {
        self.game.heuristic(state)
    }

    fn remaining(&self) -> u64 {
        self.budget.remaining()
    }
}
