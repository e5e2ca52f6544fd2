use crate::{FitnessFunction, Genome, Observer, fitness::score};
use log::{Level, log, warn};

/// Logs a one-line summary of every generation through the `log` facade.
#[derive(Clone, Copy, Debug)]
pub struct LogPrinter {
    level: Level,
}

impl LogPrinter {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogPrinter {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Observer for LogPrinter {
    fn observe<F: FitnessFunction>(
        &mut self,
        population: &[Genome],
        generation: usize,
        fitness: &mut F,
    ) {
        if !log::log_enabled!(self.level) {
            return;
        }
        let Some(leader) = population.first() else {
            return;
        };
        let scores: Result<Vec<u64>, _> = population.iter().map(|g| score(fitness, g)).collect();
        match scores {
            Ok(scores) => {
                let best = scores.iter().copied().max().unwrap_or(0);
                let worst = scores.iter().copied().min().unwrap_or(0);
                let average = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;
                log!(
                    self.level,
                    "generation {generation}: best {leader} ({best}), worst {worst}, average {average:.2}"
                );
            }
            Err(e) => warn!("generation {generation}: cannot summarize population: {e}"),
        }
    }
}
