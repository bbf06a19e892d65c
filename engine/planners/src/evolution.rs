//! Generational genetic planner over fixed-length action sequences.
//!
//! Each decision starts from a fresh random population. A generation is
//! evaluated member by member from the real current state; once every member
//! has a fitness the population is ranked and bred into the next generation:
//!
//! 1. **Rank selection**: sort by fitness ascending, draw parents with
//!    probability proportional to rank (1 for the worst, P for the best)
//! 2. **Crossover**: consecutive parents form pairs; each pair is recombined
//!    with uniform crossover at `crossover_rate`, otherwise copied
//! 3. **Mutation**: each offspring has one random gene resampled at
//!    `mutation_rate`
//!
//! When the budget runs out part way through a generation, the answer comes
//! from the last generation that was fully evaluated. If none was, the members
//! of the interrupted first generation that did get simulated are used.

use engine_core::{check_decision_state, Environment, PlanError, Planner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::sequence::{gene_alphabet, Sequence, DEFAULT_SEQUENCE_LENGTH};
use crate::stats::DecisionStats;

const PLANNER: &str = "genetic";

/// Configuration for [`EvolutionaryPlanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Actions per chromosome.
    pub sequence_length: usize,
    /// Members per generation. Must be even so parents pair up.
    pub population_size: usize,
    /// Probability that a parent pair is recombined.
    pub crossover_rate: f64,
    /// Probability that an offspring has one gene resampled.
    pub mutation_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            population_size: 8,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
        }
    }
}

impl EvolutionConfig {
    pub fn with_sequence_length(mut self, length: usize) -> Self {
        self.sequence_length = length;
        self
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.sequence_length == 0 {
            return Err(PlanError::InvalidConfig(
                "sequence_length must be > 0".to_string(),
            ));
        }
        if self.population_size == 0 || self.population_size % 2 != 0 {
            return Err(PlanError::InvalidConfig(format!(
                "population_size must be a positive even number, got {}",
                self.population_size
            )));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(PlanError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// A member with its fitness.
type Scored<A> = (Sequence<A>, f64);

/// Outcome of evaluating one generation.
enum Generation<A> {
    /// Every member was scored. Sorted by fitness ascending (stable).
    Complete(Vec<Scored<A>>),
    /// The budget ran out; holds the members that were scored, sorted the same way.
    Interrupted(Vec<Scored<A>>),
}

/// Draw an index into a population of `size` members sorted by fitness
/// ascending, with probability `(index + 1) / (size * (size + 1) / 2)`.
pub fn rank_select<R: Rng>(size: usize, rng: &mut R) -> usize {
    let total = size * (size + 1) / 2;
    let mut target = rng.gen_range(0..total);
    for index in 0..size {
        let weight = index + 1;
        if target < weight {
            return index;
        }
        target -= weight;
    }
    size - 1
}

/// Produce the next generation from a ranked one. Always returns exactly
/// `config.population_size` sequences.
pub(crate) fn breed<A: Copy + PartialEq, R: Rng>(
    ranked: &[Scored<A>],
    config: &EvolutionConfig,
    alphabet: &[A],
    rng: &mut R,
) -> Vec<Sequence<A>> {
    let parents: Vec<&Sequence<A>> = (0..config.population_size)
        .map(|_| &ranked[rank_select(ranked.len(), rng)].0)
        .collect();

    let mut next = Vec::with_capacity(config.population_size);
    for pair in parents.chunks_exact(2) {
        let (left, right) = if rng.gen_bool(config.crossover_rate) {
            pair[0].crossover(pair[1], rng)
        } else {
            (pair[0].clone(), pair[1].clone())
        };
        for child in [left, right] {
            if rng.gen_bool(config.mutation_rate) {
                next.push(child.mutated(alphabet, rng));
            } else {
                next.push(child);
            }
        }
    }
    next
}

/// Highest-fitness member of a ranked list, first occurrence on ties.
fn fittest<A>(ranked: &[Scored<A>]) -> Option<&Scored<A>> {
    ranked.iter().fold(None, |best: Option<&Scored<A>>, member| match best {
        Some(b) if b.1 >= member.1 => Some(b),
        _ => Some(member),
    })
}

fn rank<A>(mut members: Vec<Scored<A>>) -> Vec<Scored<A>> {
    members.sort_by(|a, b| a.1.total_cmp(&b.1));
    members
}

/// Genetic planner.
#[derive(Debug)]
pub struct EvolutionaryPlanner {
    config: EvolutionConfig,
    rng: ChaCha20Rng,
    last_stats: Option<DecisionStats>,
}

impl EvolutionaryPlanner {
    /// Create a planner, rejecting invalid tunables.
    pub fn new(config: EvolutionConfig, seed: u64) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_stats: None,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn last_stats(&self) -> Option<&DecisionStats> {
        self.last_stats.as_ref()
    }

    fn evaluate<E: Environment>(
        &mut self,
        env: &mut E,
        state: &E::State,
        population: Vec<Sequence<E::Action>>,
    ) -> Generation<E::Action> {
        let mut scored = Vec::with_capacity(population.len());
        for mut member in population {
            let sim = member.simulate(env, state, &mut self.rng);
            if sim.evaluated() {
                scored.push((member, sim.score));
            }
            if sim.exhausted {
                return Generation::Interrupted(rank(scored));
            }
        }
        Generation::Complete(rank(scored))
    }

    fn evolve<E: Environment>(
        &mut self,
        env: &mut E,
        state: &E::State,
        alphabet: &[E::Action],
        stats: &mut DecisionStats,
    ) -> Result<E::Action, PlanError> {
        let mut population: Vec<Sequence<E::Action>> = (0..self.config.population_size)
            .map(|_| Sequence::random(alphabet, self.config.sequence_length, &mut self.rng))
            .collect();
        let mut last_complete: Option<Vec<Scored<E::Action>>> = None;

        let interrupted = loop {
            match self.evaluate(env, state, population) {
                Generation::Complete(ranked) => {
                    stats.iterations += 1;
                    if let Some((_, fitness)) = fittest(&ranked) {
                        stats.history.push(*fitness);
                        trace!(generation = stats.iterations, best = fitness, "generation evaluated");
                    }
                    population = breed(&ranked, &self.config, alphabet, &mut self.rng);
                    last_complete = Some(ranked);
                }
                Generation::Interrupted(partial) => break partial,
            }
        };
        stats.exhausted = true;

        let source = match &last_complete {
            Some(ranked) => ranked,
            None => &interrupted,
        };
        let (best, fitness) =
            fittest(source).ok_or(PlanError::NoLegalFallback { planner: PLANNER })?;
        stats.best_score = Some(*fitness);
        best.first()
            .ok_or(PlanError::NoLegalFallback { planner: PLANNER })
    }
}

impl<E: Environment> Planner<E> for EvolutionaryPlanner {
    fn name(&self) -> &'static str {
        PLANNER
    }

    fn choose_action(&mut self, env: &mut E, state: &E::State) -> Result<E::Action, PlanError> {
        let legal = check_decision_state(&*env, state)?;
        let alphabet = gene_alphabet(&*env, legal);
        let mut recorder = DecisionStats::starting_at(env.remaining());

        let result = self.evolve(env, state, &alphabet, &mut recorder.stats);

        let stats = recorder.finish(env.remaining());
        debug!(
            generations = stats.iterations,
            best_score = ?stats.best_score,
            steps = stats.steps_used,
            "genetic search finished"
        );
        self.last_stats = Some(stats);
        result
    }
}
