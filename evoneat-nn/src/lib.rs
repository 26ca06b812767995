//! # evoneat-nn
//! A neural network-based implementation of the `evoneat` crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `evoneat` `Population`s, its
//! innovation [`History`], and two neural network implementations which
//! can be generated from an [`NNGenome`]:
//! - [`FeedForwardNetwork`]: a pure, single-pass network for acyclic
//!   genomes, best suited for function approximation tasks.
//! - [`RecurrentNetwork`]: accepts any genome; best suited for real-time
//!   control tasks, with new inputs set for each activation, and multiple
//!   time-steps involved.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`History`]: crate::genomics::History
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//! [`RecurrentNetwork`]: crate::networks::RecurrentNetwork
//!
//! # Example usage: Evolution of XOR function approximator
//! ```
//! use evoneat::{PopulationConfig, ReproductionConfig, SpeciationConfig};
//! use evoneat_nn::{
//!     genomics::{ConnectionScheme, GeneticConfig, NNGenome},
//!     networks, NeatConfig,
//! };
//! use std::convert::Infallible;
//! use std::num::NonZeroUsize;
//!
//! const XOR: [([f32; 2], f32); 4] = [
//!     ([0.0, 0.0], 0.0),
//!     ([0.0, 1.0], 1.0),
//!     ([1.0, 0.0], 1.0),
//!     ([1.0, 1.0], 0.0),
//! ];
//!
//! let genome = GeneticConfig {
//!     inputs: NonZeroUsize::new(2).unwrap(),
//!     connection_scheme: ConnectionScheme::Full,
//!     weight_init_stdev: 1.0,
//!     weight_min_value: -30.0,
//!     weight_max_value: 30.0,
//!     weight_mutation_chance: 0.8,
//!     weight_replace_chance: 0.1,
//!     weight_mutation_power: 0.5,
//!     link_mutation_chance: 1.0,
//!     link_addition_chance: 0.3,
//!     node_addition_chance: 0.2,
//!     ..GeneticConfig::zero()
//! };
//! let mut population = PopulationConfig {
//!     reset_on_extinction: true,
//!     speciation: SpeciationConfig {
//!         compatibility_disjoint_coefficient: 1.0,
//!         compatibility_weight_coefficient: 0.5,
//!         compatibility_threshold: 3.0,
//!         max_stagnation: 15,
//!         survival_rate: 0.2,
//!         elitism: 2,
//!         ..SpeciationConfig::zero()
//!     },
//!     reproduction: ReproductionConfig {
//!         crossover_rate: 0.75,
//!         max_stagnation: 15,
//!         survival_rate: 0.2,
//!         elitism: 2,
//!         ..ReproductionConfig::zero()
//!     },
//!     ..PopulationConfig::zero()
//! }
//! .with_size(NonZeroUsize::new(50).unwrap());
//! population.evaluation.fitness_threshold = 3.9;
//!
//! let config = NeatConfig { population, genome };
//! let network_config = config.genome.clone();
//!
//! let summary = evoneat_nn::run(
//!     config,
//!     |genome: &NNGenome| {
//!         let error: f32 = XOR
//!             .iter()
//!             .map(|(input, expected)| {
//!                 let output = networks::evaluate(genome, input, &network_config).unwrap();
//!                 (output[0] - expected).powi(2)
//!             })
//!             .sum();
//!         Ok::<_, Infallible>(4.0 - error)
//!     },
//!     NonZeroUsize::new(10),
//! )
//! .unwrap();
//!
//! assert!(summary.generations <= 10);
//! println!("Best genome: {}", summary.champion);
//! ```

pub mod genomics;
mod graph;
pub mod networks;

use genomics::{GeneticConfig, History, NNGenome};

use evoneat::{ConfigError, Population, PopulationConfig, RunError, RunSummary};
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Innovation number of a connection gene.
pub type Innovation = usize;
/// Identifier of a node gene.
pub type NodeId = usize;

/// A population of neural network genomes.
pub type NNPopulation = Population<GeneticConfig, History, NNGenome>;

/// A complete experiment configuration: the population
/// section and the genome section.
///
/// # Examples
/// ```
/// use evoneat_nn::NeatConfig;
///
/// let config = NeatConfig::zero();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeatConfig {
    pub population: PopulationConfig,
    pub genome: GeneticConfig,
}

impl NeatConfig {
    /// Returns a "zero-valued" configuration, built from
    /// [`PopulationConfig::zero`] and [`GeneticConfig::zero`].
    pub fn zero() -> NeatConfig {
        NeatConfig {
            population: PopulationConfig::zero(),
            genome: GeneticConfig::zero(),
        }
    }

    /// Checks both sections.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        self.genome.validate()
    }
}

/// Creates a population of [`NNGenome`]s from `config` and runs it
/// until the fitness threshold is reached, `generation_cap`
/// generations have been evaluated, or the population goes extinct
/// (see [`evoneat::run`]).
///
/// # Errors
/// Returns [`RunError::Config`] if the configuration is invalid,
/// and [`RunError::Fitness`] if `fitness` fails.
pub fn run<F, E>(
    config: NeatConfig,
    fitness: F,
    generation_cap: Option<NonZeroUsize>,
) -> Result<RunSummary<NNGenome>, RunError<E>>
where
    F: FnMut(&NNGenome) -> Result<f32, E>,
{
    evoneat::run(config.population, config.genome, fitness, generation_cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoneat::TerminationReason;

    #[test]
    fn invalid_config_is_reported() {
        let mut config = NeatConfig::zero();
        config.genome.link_addition_chance = 2.0;
        let result = run(config, |_| Ok::<_, ()>(0.0), NonZeroUsize::new(1));
        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::ProbabilityOutOfRange { .. }))
        ));
    }

    #[test]
    fn fitness_errors_are_returned_unchanged() {
        let result = run(
            NeatConfig::zero(),
            |_| Err::<f32, _>("evaluation failed"),
            None,
        );
        assert!(matches!(result, Err(RunError::Fitness("evaluation failed"))));
    }

    #[test]
    fn generation_cap() {
        let mut config = NeatConfig::zero();
        config.population.evaluation.fitness_threshold = 10.0;
        config.population.speciation.max_stagnation = 10;
        config.population.reproduction.max_stagnation = 10;
        let summary = run(config, |_| Ok::<_, ()>(1.0), NonZeroUsize::new(4)).unwrap();
        assert_eq!(summary.reason, TerminationReason::GenerationCap);
        assert_eq!(summary.generations, 4);
        assert_eq!(summary.reports.len(), 4);
    }
}
