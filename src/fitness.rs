use crate::{FitnessFunction, Genome, error::EvolutionError};
use std::collections::HashMap;

/// Calls `fitness` once and rejects negative scores.
///
/// Negative scores are never clamped: a weighted pool built from them would
/// have no meaningful repeat count.
pub fn score<F: FitnessFunction>(fitness: &mut F, genome: &Genome) -> Result<u64, EvolutionError> {
    let score = fitness.fitness(genome);
    u64::try_from(score).map_err(|_| EvolutionError::NegativeFitness { score })
}

/// Memoizes another fitness function per distinct genome.
///
/// The engine consults the fitness function while sorting, and selection
/// consults it again for every pair it draws. A scorer that asks a human
/// should only ask once per genome; wrap it in this.
///
/// Entries are never evicted. A long run should call [`clear`](Self::clear)
/// between generations, otherwise the cache keeps every genome ever scored.
#[derive(Debug)]
pub struct CachedFitness<F> {
    inner: F,
    cache: HashMap<Genome, i64>,
    misses: usize,
}

impl<F: FitnessFunction> CachedFitness<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            misses: 0,
        }
    }

    /// Number of calls forwarded to the wrapped function.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn cached(&self, genome: &Genome) -> Option<i64> {
        self.cache.get(genome).copied()
    }

    /// Forgets every stored score, e.g. once a generation has been replaced.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: FitnessFunction> FitnessFunction for CachedFitness<F> {
    fn fitness(&mut self, genome: &Genome) -> i64 {
        if let Some(&score) = self.cache.get(genome) {
            return score;
        }
        let score = self.inner.fitness(genome);
        self.misses += 1;
        self.cache.insert(genome.clone(), score);
        score
    }
}
