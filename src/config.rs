use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters of one evolutionary run.
///
/// Every field has a default, so a TOML file only needs to name what it
/// changes:
///
/// ```rust
/// use melody_genetics::EvolutionConfig;
///
/// let config = EvolutionConfig::from_toml_str(
///     r#"
///     population_size = 20
///     fitness_limit = 64
///     seed = 7
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.num_mutations, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Genomes per generation. Even sizes keep the size constant.
    pub population_size: usize,
    /// Bits per genome.
    pub genome_length: usize,
    /// Mutation trials per offspring.
    pub num_mutations: usize,
    /// Flip probability of each mutation trial, in `[0, 1]`.
    pub mutation_probability: f64,
    /// Stop once the best genome scores at least this much. `None` runs to
    /// `generation_limit`.
    pub fitness_limit: Option<u64>,
    pub generation_limit: usize,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            genome_length: 128,
            num_mutations: 2,
            mutation_probability: 0.5,
            fitness_limit: None,
            generation_limit: 100,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Invalid(
                "population_size must be greater than 0".into(),
            ));
        }
        if self.genome_length == 0 && self.num_mutations > 0 {
            return Err(ConfigError::Invalid(
                "genome_length must be greater than 0 when num_mutations is set".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(ConfigError::Invalid(format!(
                "mutation_probability {} is outside [0, 1]",
                self.mutation_probability
            )));
        }
        if self.population_size % 2 == 1 {
            log::warn!(
                "odd population_size {} will shrink to {} after the first generation",
                self.population_size,
                self.population_size - 1
            );
        }
        Ok(())
    }

    pub fn effective_fitness_limit(&self) -> u64 {
        self.fitness_limit.unwrap_or(u64::MAX)
    }
}
