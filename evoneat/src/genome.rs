use crate::populations::{ConfigError, SpeciationConfig, SpeciesID};

use rand::Rng;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// Besides its genetic operators, a genome carries three
/// pieces of bookkeeping written by the population: its
/// raw fitness, its fitness after sharing within its species,
/// and the species it currently belongs to.
///
/// All randomness is drawn from the generator passed in,
/// so that a seeded population evolves reproducibly.
///
/// [`Population`]: crate::Population
pub trait Genome: Sized {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Checks that `config` can be used to create and evolve genomes.
    fn check_config(config: &Self::Config) -> Result<(), ConfigError>;

    /// Returns a randomized genome.
    fn new<R: Rng + ?Sized>(
        config: &Self::Config,
        history: &mut Self::InnovationHistory,
        rng: &mut R,
    ) -> Self;

    /// Returns the genetic distance between two genomes.
    /// Must be symmetric in its genome arguments.
    fn genetic_distance(first: &Self, second: &Self, config: &SpeciationConfig) -> f32;

    /// Combines two genomes and returns a "child" genome.
    fn crossover<R: Rng + ?Sized>(
        parent1: &Self,
        parent2: &Self,
        config: &Self::Config,
        rng: &mut R,
    ) -> Self;

    /// Applies the configured mutations to the genome.
    fn mutate<R: Rng + ?Sized>(
        &mut self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
        rng: &mut R,
    );

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f32;

    /// Sets the genome's fitness after sharing within its species.
    fn set_adjusted_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness after sharing within its species.
    fn adjusted_fitness(&self) -> f32;

    /// Records the species the genome was assigned to.
    fn set_species(&mut self, species: Option<SpeciesID>);

    /// Returns the species the genome was last assigned to.
    fn species(&self) -> Option<SpeciesID>;
}

/// An Innovation History is used to keep track
/// of genetic innovations throught successive
/// generations of genomes.
///
/// The exact function and utility of the
/// InnovationHistory is left to the implementor.
/// A population holds exactly one history and lends
/// it mutably to one genome at a time.
pub trait InnovationHistory {
    type Config;

    fn new(config: &Self::Config) -> Self;
}

#[cfg(test)]
pub(crate) mod testing {
    //! A one-dimensional genome used to exercise the
    //! population machinery without a real encoding.
    use super::*;
    use crate::populations::check_non_negative;

    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub(crate) struct PointGenome {
        pub(crate) position: f32,
        fitness: f32,
        adjusted_fitness: f32,
        species: Option<SpeciesID>,
    }

    impl PointGenome {
        pub(crate) fn at(position: f32) -> PointGenome {
            PointGenome {
                position,
                fitness: 0.0,
                adjusted_fitness: 0.0,
                species: None,
            }
        }
    }

    impl PartialEq for PointGenome {
        fn eq(&self, other: &Self) -> bool {
            self.position == other.position
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub(crate) struct PointHistory;

    impl InnovationHistory for PointHistory {
        type Config = f32;

        fn new(_: &f32) -> PointHistory {
            PointHistory
        }
    }

    impl Genome for PointGenome {
        /// Mutation step size.
        type Config = f32;
        type InnovationHistory = PointHistory;

        fn check_config(step: &f32) -> Result<(), ConfigError> {
            check_non_negative("step", *step)
        }

        fn new<R: Rng + ?Sized>(_: &f32, _: &mut PointHistory, rng: &mut R) -> PointGenome {
            PointGenome::at(rng.gen_range(-1.0..1.0))
        }

        fn genetic_distance(first: &Self, second: &Self, config: &SpeciationConfig) -> f32 {
            config.compatibility_weight_coefficient * (first.position - second.position).abs()
        }

        fn crossover<R: Rng + ?Sized>(
            parent1: &Self,
            parent2: &Self,
            _: &f32,
            _: &mut R,
        ) -> PointGenome {
            PointGenome::at((parent1.position + parent2.position) / 2.0)
        }

        fn mutate<R: Rng + ?Sized>(&mut self, _: &mut PointHistory, step: &f32, rng: &mut R) {
            self.position += rng.gen_range(-1.0f32..=1.0) * step;
        }

        fn set_fitness(&mut self, fitness: f32) {
            self.fitness = fitness;
        }

        fn fitness(&self) -> f32 {
            self.fitness
        }

        fn set_adjusted_fitness(&mut self, fitness: f32) {
            self.adjusted_fitness = fitness;
        }

        fn adjusted_fitness(&self) -> f32 {
            self.adjusted_fitness
        }

        fn set_species(&mut self, species: Option<SpeciesID>) {
            self.species = species;
        }

        fn species(&self) -> Option<SpeciesID> {
            self.species
        }
    }
}
