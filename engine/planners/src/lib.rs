//! Budget-limited decision-time planners
//!
//! Every planner here implements the `engine-core` [`Planner`] contract: it is
//! called once per decision with the real current state, drives the
//! environment's metered `step` until the budget runs out (or a goal is
//! found), and returns one legal action.
//!
//! - [`RandomPlanner`]: uniform random baseline
//! - [`RandomSequencePlanner`]: head of one randomly played sequence
//! - [`OneStepLookaheadPlanner`]: greedy on the heuristic one ply ahead
//! - [`LocalSearchPlanner`]: hill-climbing over fixed-length [`Sequence`]s
//! - [`EvolutionaryPlanner`]: generational genetic algorithm over sequences
//! - [`UninformedGraphPlanner`]: breadth-first or depth-first graph search
//! - [`InformedGraphPlanner`]: A* with cost relaxation
//!
//! Monte Carlo Tree Search lives in the `mcts` crate; [`build_planner`] builds
//! any of the above, MCTS included, from a [`PlannerKind`].
//!
//! [`Planner`]: engine_core::Planner

pub mod evolution;
pub mod graph;
pub mod kind;
pub mod local_search;
pub mod lookahead;
pub mod random;
pub mod random_sequence;
pub mod sequence;
pub mod stats;

pub use evolution::{rank_select, EvolutionConfig, EvolutionaryPlanner};
pub use graph::informed::InformedGraphPlanner;
pub use graph::uninformed::{Traversal, UninformedGraphPlanner};
pub use graph::{GraphNode, NodeId, SearchGraph};
pub use kind::{build_planner, PlannerKind, PlannerSettings, UnknownPlanner};
pub use local_search::{LocalSearchConfig, LocalSearchPlanner};
pub use lookahead::OneStepLookaheadPlanner;
pub use random::RandomPlanner;
pub use random_sequence::{RandomSequenceConfig, RandomSequencePlanner};
pub use sequence::{Sequence, Simulation, DEFAULT_SEQUENCE_LENGTH};
pub use stats::DecisionStats;


/// Small deterministic environments shared by unit tests across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    use engine_core::Game;
    use rand_chacha::ChaCha20Rng;

    /// start(0) -> mid(1) -> win(2). Only Forward is legal at the start.
    #[derive(Debug, Clone)]
    pub struct Chain;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Dir {
        Back,
        Forward,
    }

    impl Game for Chain {
        type State = u8;
        type Action = Dir;

        fn is_win(&self, state: &u8) -> bool {
            *state == 2
        }

        fn is_lose(&self, _state: &u8) -> bool {
            false
        }

        fn legal_actions(&self, state: &u8) -> Vec<Dir> {
            match state {
                0 => vec![Dir::Forward],
                1 => vec![Dir::Back, Dir::Forward],
                _ => Vec::new(),
            }
        }

        fn all_actions(&self) -> Vec<Dir> {
            vec![Dir::Back, Dir::Forward]
        }

        fn successor(&mut self, state: &u8, action: Dir, _rng: &mut ChaCha20Rng) -> u8 {
            match action {
                Dir::Back => state.saturating_sub(1),
                Dir::Forward => (state + 1).min(2),
            }
        }

        fn evaluate(&self, initial: &u8, result: &u8) -> f64 {
            f64::from(*result) - f64::from(*initial)
        }

        fn heuristic(&self, state: &u8) -> f64 {
            f64::from(2u8.saturating_sub(*state))
        }
    }

    /// start(0): Left loses at once (1), Right reaches mid (2);
    /// mid: Left returns to the start, Right wins (3).
    #[derive(Debug, Clone)]
    pub struct LoseFork;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Side {
        Left,
        Right,
    }

    impl Game for LoseFork {
        type State = u8;
        type Action = Side;

        fn is_win(&self, state: &u8) -> bool {
            *state == 3
        }

        fn is_lose(&self, state: &u8) -> bool {
            *state == 1
        }

        fn legal_actions(&self, state: &u8) -> Vec<Side> {
            match state {
                0 | 2 => vec![Side::Left, Side::Right],
                _ => Vec::new(),
            }
        }

        fn all_actions(&self) -> Vec<Side> {
            vec![Side::Left, Side::Right]
        }

        fn successor(&mut self, state: &u8, action: Side, _rng: &mut ChaCha20Rng) -> u8 {
            match (state, action) {
                (0, Side::Left) => 1,
                (0, Side::Right) => 2,
                (2, Side::Left) => 0,
                (2, Side::Right) => 3,
                (s, _) => *s,
            }
        }

        fn evaluate(&self, initial: &u8, result: &u8) -> f64 {
            let value = |s: u8| match s {
                1 => -10.0,
                2 => 1.0,
                3 => 10.0,
                _ => 0.0,
            };
            value(*result) - value(*initial)
        }
    }

    /// Two routes to the goal: START -> A -> X -> C -> GOAL and the shorter
    /// START -> B -> C -> GOAL. The heuristic (admissible) lures search down
    /// the long branch first, so C is generated with a costly path and must be
    /// relaxed when B is expanded. Actions name the state they lead to.
    #[derive(Debug, Clone)]
    pub struct Diamond;

    impl Diamond {
        pub const START: u8 = 0;
        pub const A: u8 = 1;
        pub const X: u8 = 2;
        pub const B: u8 = 3;
        pub const C: u8 = 4;
        pub const GOAL: u8 = 5;
    }

    impl Game for Diamond {
        type State = u8;
        type Action = u8;

        fn is_win(&self, state: &u8) -> bool {
            *state == Diamond::GOAL
        }

        fn is_lose(&self, _state: &u8) -> bool {
            false
        }

        fn legal_actions(&self, state: &u8) -> Vec<u8> {
            match *state {
                Diamond::START => vec![Diamond::A, Diamond::B],
                Diamond::A => vec![Diamond::X],
                Diamond::X | Diamond::B => vec![Diamond::C],
                Diamond::C => vec![Diamond::GOAL],
                _ => Vec::new(),
            }
        }

        fn all_actions(&self) -> Vec<u8> {
            (Diamond::START..=Diamond::GOAL).collect()
        }

        fn successor(&mut self, _state: &u8, action: u8, _rng: &mut ChaCha20Rng) -> u8 {
            action
        }

        fn evaluate(&self, _initial: &u8, result: &u8) -> f64 {
            f64::from(u8::from(*result == Diamond::GOAL))
        }

        fn heuristic(&self, state: &u8) -> f64 {
            match *state {
                Diamond::B => 2.0,
                Diamond::C => 1.0,
                _ => 0.0,
            }
        }
    }
}
