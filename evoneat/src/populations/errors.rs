use thiserror::Error;

/// A configuration value is out of its valid range,
/// or inconsistent with another value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} is not a number")]
    NotANumber { name: &'static str },
    #[error("{name} bounds are inverted (min {min} > max {max})")]
    InvertedBounds {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
    #[error("{name} is set to {first} in one section and to {second} in another")]
    Mismatch {
        name: &'static str,
        first: String,
        second: String,
    },
    #[error("{name} option set is empty")]
    EmptyOptions { name: &'static str },
    #[error("{name} is not one of its options")]
    DefaultNotAnOption { name: &'static str },
}

/// Evolution of a population could not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvolutionError {
    /// Every species was excluded from reproduction.
    #[error("all species went extinct in generation {generation}")]
    Extinction { generation: usize },
}

/// Failure of a complete run started through [`run`].
///
/// [`run`]: crate::run
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The fitness function failed; its error is kept unchanged.
    #[error("fitness evaluation failed: {0}")]
    Fitness(E),
}
