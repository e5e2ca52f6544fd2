use crate::{Genome, Mutation, error::EvolutionError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Runs `num_flips` independent trials on `genome` and returns it.
///
/// Each trial picks an index uniformly with replacement and flips that bit
/// with probability `probability`. The same bit may be hit several times,
/// so the number of changed bits is anywhere between 0 and `num_flips`.
///
/// # Errors
///
/// * [`EvolutionError::InvalidProbability`] if `probability` is not in `[0, 1]`.
/// * [`EvolutionError::DegenerateGenome`] if the genome is empty and at
///   least one trial is requested.
pub fn mutation<R: Rng>(
    mut genome: Genome,
    num_flips: usize,
    probability: f64,
    rng: &mut R,
) -> Result<Genome, EvolutionError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(EvolutionError::InvalidProbability(probability));
    }
    if num_flips == 0 {
        return Ok(genome);
    }
    if genome.is_empty() {
        return Err(EvolutionError::DegenerateGenome);
    }
    for _ in 0..num_flips {
        let index = rng.random_range(0..genome.len());
        if rng.random_bool(probability) {
            genome.flip(index);
        }
    }
    Ok(genome)
}

/// Bit-flip mutation with a fixed trial count and per-trial probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BitFlipMutation {
    pub num_flips: usize,
    pub probability: f64,
}

impl BitFlipMutation {
    pub fn new(num_flips: usize, probability: f64) -> Self {
        Self {
            num_flips,
            probability,
        }
    }
}

impl Default for BitFlipMutation {
    fn default() -> Self {
        Self::new(2, 0.5)
    }
}

impl Mutation for BitFlipMutation {
    fn mutate<R: Rng>(&mut self, genome: Genome, rng: &mut R) -> Result<Genome, EvolutionError> {
        mutation(genome, self.num_flips, self.probability, rng)
    }
}
