use crate::{FitnessFunction, Genome, Population, Selection, error::EvolutionError, fitness::score};
use rand::Rng;
use std::iter;

/// Fitness-proportionate sampling structure.
///
/// Conceptually a multiset in which every genome appears `fitness + 1`
/// times, in population order. Positions are resolved through cumulative
/// weights so a large score costs one integer, not that many copies.
#[derive(Clone, Debug)]
pub struct WeightedPool<'a> {
    genomes: &'a [Genome],
    cumulative: Vec<u64>,
}

impl<'a> WeightedPool<'a> {
    /// Total number of positions in the pool.
    pub fn len(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many positions the genome at `index` occupies, or `None` if
    /// `index` is out of bounds.
    pub fn count(&self, index: usize) -> Option<u64> {
        let end = *self.cumulative.get(index)?;
        let start = match index {
            0 => 0,
            _ => self.cumulative[index - 1],
        };
        Some(end - start)
    }

    /// Population index of the genome occupying `position`.
    pub fn index_of(&self, position: u64) -> Option<usize> {
        if position >= self.len() {
            return None;
        }
        Some(self.cumulative.partition_point(|&end| end <= position))
    }

    pub fn get(&self, position: u64) -> Option<&'a Genome> {
        self.index_of(position).map(|i| &self.genomes[i])
    }

    /// Expands the multiset in order. Allocation-free, but visits every
    /// position, so only use it on small pools.
    pub fn iter(&self) -> impl Iterator<Item = &'a Genome> + '_ {
        self.genomes
            .iter()
            .enumerate()
            .flat_map(|(i, g)| iter::repeat_n(g, self.count(i).unwrap_or(0) as usize))
    }
}

/// Sum of the fitness of every genome.
///
/// # Errors
///
/// [`EvolutionError::EmptyPopulation`], [`EvolutionError::NegativeFitness`]
/// or [`EvolutionError::FitnessOverflow`].
pub fn population_fitness<F: FitnessFunction>(
    population: &[Genome],
    fitness: &mut F,
) -> Result<u64, EvolutionError> {
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    population.iter().try_fold(0u64, |total, genome| {
        total
            .checked_add(score(fitness, genome)?)
            .ok_or(EvolutionError::FitnessOverflow)
    })
}

/// Builds the weighted pool, giving every genome `fitness + 1` positions so
/// that zero-fitness genomes can still be drawn.
pub fn generate_weighted_distribution<'a, F: FitnessFunction>(
    population: &'a [Genome],
    fitness: &mut F,
) -> Result<WeightedPool<'a>, EvolutionError> {
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    let mut cumulative = Vec::with_capacity(population.len());
    let mut total = 0u64;
    for genome in population {
        let weight = score(fitness, genome)?
            .checked_add(1)
            .ok_or(EvolutionError::FitnessOverflow)?;
        total = total
            .checked_add(weight)
            .ok_or(EvolutionError::FitnessOverflow)?;
        cumulative.push(total);
    }
    Ok(WeightedPool {
        genomes: population,
        cumulative,
    })
}

/// Draws two distinct pool positions uniformly without replacement.
///
/// Distinct positions do not imply distinct genomes: a dominant genome can
/// be returned as both parents.
pub fn selection_pair<F: FitnessFunction, R: Rng>(
    population: &[Genome],
    fitness: &mut F,
    rng: &mut R,
) -> Result<(Genome, Genome), EvolutionError> {
    let pool = generate_weighted_distribution(population, fitness)?;
    let n = pool.len();
    if n < 2 {
        return Err(EvolutionError::PoolTooSmall(n as usize));
    }
    let first = rng.random_range(0..n);
    let mut second = rng.random_range(0..n - 1);
    if second >= first {
        second += 1;
    }
    pool.get(first)
        .zip(pool.get(second))
        .map(|(a, b)| (a.clone(), b.clone()))
        .ok_or(EvolutionError::PoolTooSmall(population.len()))
}

/// Evaluates each genome once, in order, then stable-sorts by fitness
/// descending. Returns the sorted genomes and their scores.
pub fn sort_scored<F: FitnessFunction>(
    population: Population,
    fitness: &mut F,
) -> Result<(Population, Vec<u64>), EvolutionError> {
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    let mut scored = population
        .into_iter()
        .map(|genome| Ok((score(fitness, &genome)?, genome)))
        .collect::<Result<Vec<_>, EvolutionError>>()?;
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(scored.into_iter().map(|(s, g)| (g, s)).unzip())
}

/// Fitness-descending copy of `population`; equal scores keep their
/// original relative order.
pub fn sort_population<F: FitnessFunction>(
    population: Population,
    fitness: &mut F,
) -> Result<Population, EvolutionError> {
    sort_scored(population, fitness).map(|(sorted, _)| sorted)
}

/// Roulette selection over the `fitness + 1` weighted pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeightedSelection;

impl Selection for WeightedSelection {
    fn select_pair<F: FitnessFunction, R: Rng>(
        &mut self,
        population: &[Genome],
        fitness: &mut F,
        rng: &mut R,
    ) -> Result<(Genome, Genome), EvolutionError> {
        selection_pair(population, fitness, rng)
    }
}
