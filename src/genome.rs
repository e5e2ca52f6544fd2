use crate::{Populate, error::ParseGenomeError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-length bit string.
///
/// The length is set at creation and never changes; operators only flip
/// bits or build new genomes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome(Vec<bool>);

/// One generation, in insertion order before sorting and fitness-descending
/// order after.
pub type Population = Vec<Genome>;

impl Genome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// A genome of `length` zero bits.
    pub fn zeros(length: usize) -> Self {
        Self(vec![false; length])
    }

    /// A genome of `length` one bits.
    pub fn ones(length: usize) -> Self {
        Self(vec![true; length])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Flips the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn flip(&mut self, index: usize) {
        self.0[index] = !self.0[index];
    }

    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Builds `self[..point] ++ other[point..]` without touching either input.
    pub(crate) fn splice(&self, other: &Self, point: usize) -> Self {
        let mut bits = Vec::with_capacity(self.len());
        bits.extend_from_slice(&self.0[..point]);
        bits.extend_from_slice(&other.0[point..]);
        Self(bits)
    }
}

impl From<Vec<bool>> for Genome {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = ParseGenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseGenomeError { found, position }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A genome of `length` bits, each drawn uniformly from {0, 1}.
pub fn generate_genome<R: Rng>(length: usize, rng: &mut R) -> Genome {
    Genome((0..length).map(|_| rng.random_bool(0.5)).collect())
}

/// `size` independently generated genomes of `genome_length` bits.
pub fn generate_population<R: Rng>(size: usize, genome_length: usize, rng: &mut R) -> Population {
    (0..size)
        .map(|_| generate_genome(genome_length, rng))
        .collect()
}

/// Renders a genome as a string of `0`/`1` characters. Display only.
pub fn genome_to_string(genome: &Genome) -> String {
    genome.to_string()
}

/// Default populate strategy: `size` random genomes of `genome_length` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomPopulation {
    pub size: usize,
    pub genome_length: usize,
}

impl RandomPopulation {
    pub fn new(size: usize, genome_length: usize) -> Self {
        Self {
            size,
            genome_length,
        }
    }
}

impl Populate for RandomPopulation {
    fn populate<R: Rng>(&mut self, rng: &mut R) -> Population {
        generate_population(self.size, self.genome_length, rng)
    }
}
