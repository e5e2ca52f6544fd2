use crate::algorithms::{
    crossover::SinglePointCrossover,
    mutation::BitFlipMutation,
    selection::{WeightedSelection, sort_scored},
};
use crate::genome::RandomPopulation;
use crate::{
    ConfigError, Crossover, EvolutionConfig, EvolutionError, FitnessFunction, Genome, Mutation,
    Observer, Populate, Population, Selection,
};
use log::{debug, info, trace};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg64;

/// Runs the generational loop until a genome reaches `fitness_limit` or
/// `generation_limit` generations have been evaluated.
///
/// Each generation is evaluated and stable-sorted best first, shown to
/// `observer`, checked against `fitness_limit`, and then replaced by the two
/// best genomes followed by `N/2 - 1` pairs of mutated offspring.
///
/// Returns the final population and the index of the last generation:
///
/// * on success, the sorted generation whose leader reached the limit, and
///   its index;
/// * on exhaustion, the last bred population *as bred* (not re-sorted), and
///   `generation_limit - 1`. With a `generation_limit` of 0 nothing is
///   evaluated and generation 0 comes back untouched.
///
/// An odd population size `N` is not corrected: the next generation holds
/// `N - 1` genomes and stays at that size.
///
/// # Errors
///
/// Any [`EvolutionError`] raised by a strategy aborts the run.
#[allow(clippy::too_many_arguments)]
pub fn run_evolution<P, F, S, C, M, O, R>(
    populate: &mut P,
    fitness: &mut F,
    fitness_limit: u64,
    selection: &mut S,
    crossover: &mut C,
    mutation: &mut M,
    generation_limit: usize,
    observer: &mut O,
    rng: &mut R,
) -> Result<(Population, usize), EvolutionError>
where
    P: Populate,
    F: FitnessFunction,
    S: Selection,
    C: Crossover,
    M: Mutation,
    O: Observer,
    R: Rng,
{
    let mut population = populate.populate(rng);
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }

    for generation in 0..generation_limit {
        let (sorted, scores) = sort_scored(population, fitness)?;
        observer.observe(&sorted, generation, fitness);

        let best = scores[0];
        debug!(
            "generation {generation}: {} genomes, best fitness {best}",
            sorted.len()
        );
        if best >= fitness_limit {
            info!("fitness limit {fitness_limit} reached at generation {generation}");
            return Ok((sorted, generation));
        }

        population = next_generation(&sorted, fitness, selection, crossover, mutation, rng)?;
    }

    info!("generation limit {generation_limit} exhausted without reaching {fitness_limit}");
    Ok((population, generation_limit.saturating_sub(1)))
}

/// Breeds the generation that follows `sorted`.
///
/// `sorted[0]` and `sorted[1]` are carried over untouched, then `N/2 - 1`
/// rounds each select a pair, cross it over and mutate both children.
pub fn next_generation<F, S, C, M, R>(
    sorted: &[Genome],
    fitness: &mut F,
    selection: &mut S,
    crossover: &mut C,
    mutation: &mut M,
    rng: &mut R,
) -> Result<Population, EvolutionError>
where
    F: FitnessFunction,
    S: Selection,
    C: Crossover,
    M: Mutation,
    R: Rng,
{
    if sorted.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    let rounds = (sorted.len() / 2).saturating_sub(1);
    let mut next = Vec::with_capacity(2 + 2 * rounds);
    next.extend(sorted.iter().take(2).cloned());

    for round in 0..rounds {
        let (a, b) = selection.select_pair(sorted, fitness, rng)?;
        let (child_a, child_b) = crossover.crossover(&a, &b, rng)?;
        next.push(mutation.mutate(child_a, rng)?);
        next.push(mutation.mutate(child_b, rng)?);
        trace!("round {round}: parents {a} x {b}");
    }
    Ok(next)
}

/// One evaluated generation, as seen by [`GenerationalGA::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    /// The evaluated generation, best first.
    pub population: Population,
    /// Scores aligned with `population`.
    pub scores: Vec<u64>,
}

impl GenerationReport {
    pub fn best(&self) -> Option<(&Genome, u64)> {
        self.population.first().zip(self.scores.first().copied())
    }
}

/// Generational GA with elitism of two, owning its strategies and a
/// seeded [`Pcg64`] so runs are reproducible.
///
/// It can either [`run`](Self::run) to completion or be driven one
/// generation at a time with [`step`](Self::step), which suits hosts that
/// stop between generations (e.g. to let a listener decide whether to go on).
pub struct GenerationalGA<S = WeightedSelection, C = SinglePointCrossover, M = BitFlipMutation> {
    population: Population,
    generation: usize,
    selection: S,
    crossover: C,
    mutation: M,
    fitness_limit: u64,
    generation_limit: usize,
    rng: Pcg64,
}

impl GenerationalGA {
    /// Starts from `initial_pop` with weighted selection, single-point
    /// crossover and default bit-flip mutation. No fitness limit, 100
    /// generations.
    pub fn new(initial_pop: Population, seed: u64) -> Self {
        Self {
            population: initial_pop,
            generation: 0,
            selection: WeightedSelection,
            crossover: SinglePointCrossover,
            mutation: BitFlipMutation::default(),
            fitness_limit: u64::MAX,
            generation_limit: 100,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Validates `config`, seeds the RNG and draws a random generation 0.
    pub fn from_config(config: &EvolutionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_os_rng(),
        };
        let population =
            RandomPopulation::new(config.population_size, config.genome_length).populate(&mut rng);
        Ok(Self {
            population,
            generation: 0,
            selection: WeightedSelection,
            crossover: SinglePointCrossover,
            mutation: BitFlipMutation::new(config.num_mutations, config.mutation_probability),
            fitness_limit: config.effective_fitness_limit(),
            generation_limit: config.generation_limit,
            rng,
        })
    }
}

impl<S: Selection, C: Crossover, M: Mutation> GenerationalGA<S, C, M> {
    pub fn with_limits(mut self, fitness_limit: u64, generation_limit: usize) -> Self {
        self.fitness_limit = fitness_limit;
        self.generation_limit = generation_limit;
        self
    }

    pub fn with_selection<S2: Selection>(self, selection: S2) -> GenerationalGA<S2, C, M> {
        GenerationalGA {
            population: self.population,
            generation: self.generation,
            selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness_limit: self.fitness_limit,
            generation_limit: self.generation_limit,
            rng: self.rng,
        }
    }

    pub fn with_crossover<C2: Crossover>(self, crossover: C2) -> GenerationalGA<S, C2, M> {
        GenerationalGA {
            population: self.population,
            generation: self.generation,
            selection: self.selection,
            crossover,
            mutation: self.mutation,
            fitness_limit: self.fitness_limit,
            generation_limit: self.generation_limit,
            rng: self.rng,
        }
    }

    pub fn with_mutation<M2: Mutation>(self, mutation: M2) -> GenerationalGA<S, C, M2> {
        GenerationalGA {
            population: self.population,
            generation: self.generation,
            selection: self.selection,
            crossover: self.crossover,
            mutation,
            fitness_limit: self.fitness_limit,
            generation_limit: self.generation_limit,
            rng: self.rng,
        }
    }

    /// The current, not yet evaluated, generation.
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Index of the current generation.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn fitness_limit(&self) -> u64 {
        self.fitness_limit
    }

    pub fn generation_limit(&self) -> usize {
        self.generation_limit
    }

    /// Shuffles the current generation with the owned RNG.
    ///
    /// The sort in [`step`](Self::step) is stable, so without a shuffle the
    /// carried-over elites sit first and win every tie. Call this before each
    /// step when scores tie often, as with a coarse human rating.
    pub fn shuffle(&mut self) {
        self.population.shuffle(&mut self.rng);
    }

    /// Evaluates and sorts the current generation, breeds the next one and
    /// makes it current. Ignores both limits; the caller decides when to stop.
    ///
    /// On error the current generation is left in place.
    pub fn step<F: FitnessFunction>(
        &mut self,
        fitness: &mut F,
    ) -> Result<GenerationReport, EvolutionError> {
        let (sorted, scores) = sort_scored(self.population.clone(), fitness)?;
        let next = next_generation(
            &sorted,
            fitness,
            &mut self.selection,
            &mut self.crossover,
            &mut self.mutation,
            &mut self.rng,
        )?;
        let report = GenerationReport {
            generation: self.generation,
            population: sorted,
            scores,
        };
        debug!(
            "stepped generation {}: best fitness {}",
            report.generation, report.scores[0]
        );
        self.population = next;
        self.generation += 1;
        Ok(report)
    }

    /// Runs [`run_evolution`] from the current generation with the
    /// configured limits. Generation indices in the result are relative to
    /// the start of this run.
    pub fn run<F: FitnessFunction, O: Observer>(
        mut self,
        fitness: &mut F,
        observer: &mut O,
    ) -> Result<(Population, usize), EvolutionError> {
        run_evolution(
            &mut self.population,
            fitness,
            self.fitness_limit,
            &mut self.selection,
            &mut self.crossover,
            &mut self.mutation,
            self.generation_limit,
            observer,
            &mut self.rng,
        )
    }
}
