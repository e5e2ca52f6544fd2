use rand::Rng;

pub mod config;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod melody;
pub mod observer;

pub mod algorithms {
    pub mod crossover;
    pub mod generational;
    pub mod mutation;
    pub mod selection;
}

pub use config::EvolutionConfig;
pub use error::{ConfigError, EvolutionError, MelodyError, ParseGenomeError};
pub use genome::{Genome, Population};

/// Scores a genome. Higher is better; scores must be non-negative.
///
/// Takes `&mut self` so scorers with side effects (prompting a listener,
/// driving an audio pipeline) fit the same seam as pure ones. Any
/// `FnMut(&Genome) -> i64` closure is a fitness function.
pub trait FitnessFunction {
    fn fitness(&mut self, genome: &Genome) -> i64;
}

impl<F> FitnessFunction for F
where
    F: FnMut(&Genome) -> i64,
{
    fn fitness(&mut self, genome: &Genome) -> i64 {
        self(genome)
    }
}

/// Produces generation 0.
pub trait Populate {
    fn populate<R: Rng>(&mut self, rng: &mut R) -> Population;
}

/// A fixed, caller-supplied initial population.
impl Populate for Vec<Genome> {
    fn populate<R: Rng>(&mut self, _rng: &mut R) -> Population {
        self.clone()
    }
}

/// Picks two parents from a population.
pub trait Selection {
    fn select_pair<F: FitnessFunction, R: Rng>(
        &mut self,
        population: &[Genome],
        fitness: &mut F,
        rng: &mut R,
    ) -> Result<(Genome, Genome), EvolutionError>;
}

/// Recombines two parents into two fresh children.
pub trait Crossover {
    fn crossover<R: Rng>(
        &mut self,
        a: &Genome,
        b: &Genome,
        rng: &mut R,
    ) -> Result<(Genome, Genome), EvolutionError>;
}

/// Mutates an exclusively owned genome and hands it back.
pub trait Mutation {
    fn mutate<R: Rng>(&mut self, genome: Genome, rng: &mut R) -> Result<Genome, EvolutionError>;
}

/// Side channel invoked once per generation, after sorting and before the
/// termination check. Must not influence the run.
pub trait Observer {
    fn observe<F: FitnessFunction>(
        &mut self,
        population: &[Genome],
        generation: usize,
        fitness: &mut F,
    );
}

/// No observer.
impl Observer for () {
    fn observe<F: FitnessFunction>(&mut self, _: &[Genome], _: usize, _: &mut F) {}
}
