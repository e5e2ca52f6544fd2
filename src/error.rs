use thiserror::Error;

/// Fatal conditions raised by the genetic operators and the engine.
///
/// None of these are retried; they surface to the caller as soon as they
/// are detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    #[error("genome lengths differ: {left} vs {right}")]
    InvalidGenomeLength { left: usize, right: usize },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("cannot mutate a zero-length genome")]
    DegenerateGenome,

    #[error("fitness function returned negative score {score}")]
    NegativeFitness { score: i64 },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("weighted pool holds {0} entries, at least 2 are needed to draw a pair")]
    PoolTooSmall(usize),

    #[error("accumulated fitness overflows u64")]
    FitnessOverflow,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bit character {found:?} at position {position}")]
pub struct ParseGenomeError {
    pub found: char,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MelodyError {
    #[error("genome has {actual} bits, the melody needs {expected}")]
    GenomeTooShort { expected: usize, actual: usize },

    #[error("unknown {kind} {name:?}")]
    UnknownName { kind: &'static str, name: String },

    #[error("invalid melody configuration: {0}")]
    Invalid(String),
}
