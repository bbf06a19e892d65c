//! Fixed-length action sequences, the unit optimized by hill-climbing and the
//! genetic planner.
//!
//! Operators never modify a sequence that is already part of a population;
//! `perturb`, `crossover` and `mutated` all produce new values. The one
//! exception is gene repair inside [`Sequence::simulate`], which rewrites genes
//! that were illegal where they were applied.

use engine_core::{Environment, Outcome};
use rand::Rng;

/// Default number of actions per sequence.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 5;

/// Ordered list of actions evaluated as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<A> {
    genes: Vec<A>,
}

/// Result of playing a sequence forward from a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    /// `evaluate(initial, last_reached_state)`
    pub score: f64,
    /// Steps that succeeded
    pub steps: usize,
    /// A step reported the budget exhausted
    pub exhausted: bool,
}

impl Simulation {
    /// Whether the sequence was actually scored on simulated progress.
    /// A sequence whose first step was refused carries no information.
    pub fn evaluated(&self) -> bool {
        self.steps > 0
    }
}

impl<A: Copy + PartialEq> Sequence<A> {
    /// Sample every gene uniformly from `alphabet`.
    pub fn random<R: Rng>(alphabet: &[A], length: usize, rng: &mut R) -> Self {
        let genes = (0..length).map(|_| sample(alphabet, rng)).collect();
        Self { genes }
    }

    pub fn from_genes(genes: Vec<A>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[A] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The action to play now.
    pub fn first(&self) -> Option<A> {
        self.genes.first().copied()
    }

    /// Hill-climbing neighbour: each position independently keeps its gene or,
    /// on a fair coin flip, takes a fresh one from `alphabet`.
    pub fn perturb<R: Rng>(&self, alphabet: &[A], rng: &mut R) -> Self {
        let genes = self
            .genes
            .iter()
            .map(|&gene| {
                if rng.gen_bool(0.5) {
                    sample(alphabet, rng)
                } else {
                    gene
                }
            })
            .collect();
        Self { genes }
    }

    /// Uniform crossover: each position swaps between the two children with
    /// probability 0.5. Both parents must have the same length.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        debug_assert_eq!(self.len(), other.len());
        let mut left = self.genes.clone();
        let mut right = other.genes.clone();
        for (a, b) in left.iter_mut().zip(right.iter_mut()) {
            if rng.gen_bool(0.5) {
                std::mem::swap(a, b);
            }
        }
        (Self { genes: left }, Self { genes: right })
    }

    /// Copy with exactly one uniformly chosen gene resampled from `alphabet`.
    /// The new gene may equal the old one.
    pub fn mutated<R: Rng>(&self, alphabet: &[A], rng: &mut R) -> Self {
        let mut genes = self.genes.clone();
        if !genes.is_empty() {
            let index = rng.gen_range(0..genes.len());
            genes[index] = sample(alphabet, rng);
        }
        Self { genes }
    }

    /// Play the sequence from `initial`, stopping early on a terminal state or
    /// when the budget runs out, and score the last state reached.
    ///
    /// A gene that is not legal at the state where it applies is replaced in
    /// place by a uniformly random legal action, so after simulation the first
    /// gene is always legal at `initial`.
    pub fn simulate<E, R>(&mut self, env: &mut E, initial: &E::State, rng: &mut R) -> Simulation
    where
        E: Environment<Action = A>,
        R: Rng,
    {
        let mut state = initial.clone();
        let mut steps = 0;
        let mut exhausted = false;

        for gene in self.genes.iter_mut() {
            if env.is_terminal(&state) {
                break;
            }
            let legal = env.legal_actions(&state);
            if legal.is_empty() {
                break;
            }
            if !legal.contains(gene) {
                *gene = sample(&legal, rng);
            }
            match env.step(&state, *gene) {
                Outcome::Continue(next) => {
                    state = next;
                    steps += 1;
                }
                Outcome::Exhausted(last) => {
                    state = last;
                    exhausted = true;
                    break;
                }
            }
        }

        Simulation {
            score: env.evaluate(initial, &state),
            steps,
            exhausted,
        }
    }
}

/// Actions genes are drawn from: the environment's full alphabet, or the legal
/// actions at the decision state if the environment reports none.
pub(crate) fn gene_alphabet<E: Environment>(env: &E, legal: Vec<E::Action>) -> Vec<E::Action> {
    let all = env.all_actions();
    if all.is_empty() {
        legal
    } else {
        all
    }
}

fn sample<A: Copy, R: Rng>(choices: &[A], rng: &mut R) -> A {
    choices[rng.gen_range(0..choices.len())]
}
