use crate::{Crossover, Genome, error::EvolutionError};
use rand::Rng;

/// Splices two equal-length parents at one random cut point.
///
/// For parents of length `L >= 2` a cut `p` is drawn uniformly from
/// `[1, L-1]` and the children are `a[..p] ++ b[p..]` and `b[..p] ++ a[p..]`.
/// Shorter parents have no interior cut and come back unchanged.
///
/// # Errors
///
/// [`EvolutionError::InvalidGenomeLength`] if the parents differ in length.
pub fn single_point_crossover<R: Rng>(
    a: &Genome,
    b: &Genome,
    rng: &mut R,
) -> Result<(Genome, Genome), EvolutionError> {
    if a.len() != b.len() {
        return Err(EvolutionError::InvalidGenomeLength {
            left: a.len(),
            right: b.len(),
        });
    }
    let length = a.len();
    if length < 2 {
        return Ok((a.clone(), b.clone()));
    }
    let p = rng.random_range(1..length);
    Ok((a.splice(b, p), b.splice(a, p)))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinglePointCrossover;

impl Crossover for SinglePointCrossover {
    fn crossover<R: Rng>(
        &mut self,
        a: &Genome,
        b: &Genome,
        rng: &mut R,
    ) -> Result<(Genome, Genome), EvolutionError> {
        single_point_crossover(a, b, rng)
    }
}
