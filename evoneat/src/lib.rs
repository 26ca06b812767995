//! An implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! The engine is generic over the genome encoding via the [`Genome`]
//! trait: it owns the generation loop (evaluation, speciation, offspring
//! allotment, selection, elitism, stagnation and extinction handling),
//! while the genome supplies creation, mutation, crossover and genetic
//! distance. A neural network-based genome, as in the original algorithm,
//! is supplied by the `evoneat-nn` crate.
//!
//! Runs are reproducible: every random decision is drawn from a
//! generator owned by the [`Population`], which can be [seeded].
//! Progress is reported through the [`log`](https://docs.rs/log) facade.
//!
//! [seeded]: Population::with_seed
//!
//! # Example usage: Evolution of XOR function approximator, using `evoneat-nn`
//! ```
//! use evoneat::{
//!     Genome, Population, PopulationConfig, ReproductionConfig, SpeciationConfig,
//!     StagnationCriterion,
//! };
//! use evoneat_nn::{
//!     genomics::{ConnectionScheme, GeneticConfig, NNGenome},
//!     networks::FeedForwardNetwork,
//! };
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genome: &NNGenome) -> f32 {
//!     let network = FeedForwardNetwork::new(genome).unwrap();
//!
//!     let values = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!
//!     let error: f32 = values
//!         .iter()
//!         .map(|(input, expected)| (network.evaluate(input).unwrap()[0] - expected).powi(2))
//!         .sum();
//!     4.0 - error
//! }
//!
//! let genetic_config = GeneticConfig {
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
//!
//! let population_config = PopulationConfig {
//!     speciation: SpeciationConfig {
//!         compatibility_disjoint_coefficient: 1.0,
//!         compatibility_weight_coefficient: 0.5,
//!         compatibility_threshold: 3.0,
//!         max_stagnation: 15,
//!         survival_rate: 0.2,
//!         elitism: 2,
//!         stagnation_criterion: StagnationCriterion::Absolute,
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
//!
//! let mut population =
//!     Population::<_, _, NNGenome>::with_seed(population_config, genetic_config, 7).unwrap();
//! for _ in 0..5 {
//!     population.evaluate_fitness(evaluate_xor);
//!     if population.champion().fitness() > 3.9 {
//!         println!("Solution found!: {:?}", population.champion());
//!         break;
//!     }
//!     population.evolve().unwrap();
//! }
//! ```

mod genome;
mod populations;
mod rng;

pub use genome::*;
pub use populations::*;
pub use rng::Chance;
