//! A Population is a collection of genomes.
//! These are grouped into species, which can
//! be evolved using a genome evaluation function
//! as the source of selective pressure.
//!
//! Each generation goes through the same phases:
//! the caller's fitness function _evaluates_ every genome,
//! species statistics are updated and termination is
//! checked, and then _reproduction_ builds the next
//! generation, which is _speciated_ against the
//! surviving species' representatives.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;
mod species;

use crate::{Genome, InnovationHistory};
pub use config::{
    check_bounds, check_non_negative, check_probability, EvaluationConfig, FitnessCriterion,
    PopulationConfig, ReproductionConfig, SpeciationConfig, StagnationCriterion,
};
pub use errors::{ConfigError, EvolutionError, RunError};
use logging::GenerationReport;
use offspring_factory::OffspringFactory;
pub use species::{Species, SpeciesID};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use std::convert::Infallible;
use std::num::NonZeroUsize;

/// A population of genomes.
///
/// All randomness used during evolution comes from the
/// population's own generator, so two populations created
/// [with the same seed] and evaluated with the same
/// deterministic fitness function evolve identically.
///
/// [with the same seed]: Population::with_seed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Population<C, H, G> {
    species: Vec<Species<G>>,
    history: H,
    generation: usize,
    best_ever: Option<G>,
    population_config: PopulationConfig,
    genetic_config: C,
    rng: ChaCha8Rng,
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The fitness criterion reached the configured threshold.
    FitnessThreshold,
    /// The configured number of generations was evaluated.
    GenerationCap,
    /// Every species went extinct and resetting was disabled.
    Extinction,
}

/// The outcome of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary<G> {
    /// The fittest genome evaluated during the run.
    pub champion: G,
    /// Number of generations evaluated.
    pub generations: usize,
    pub reason: TerminationReason,
    /// One report per evaluated generation.
    pub reports: Vec<GenerationReport>,
}

impl<C, H, G> Population<C, H, G>
where
    G: Genome<InnovationHistory = H, Config = C> + Clone + PartialEq,
    H: InnovationHistory<Config = C>,
{
    /// Creates a new population using the passed configurations,
    /// seeding its random number generator from system entropy.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// let pop_config = PopulationConfig {
    ///     // Set desired configuration
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig::zero();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(pop_config, genetic_config).unwrap();
    /// assert_eq!(population.genomes().count(), 1);
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, ConfigError> {
        Self::with_rng(population_config, genetic_config, ChaCha8Rng::from_entropy())
    }

    /// Creates a new population using the passed configurations,
    /// and a random number generator seeded with `seed`.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let pop_config = PopulationConfig::zero().with_size(NonZeroUsize::new(10).unwrap());
    /// # let genetic_config = GeneticConfig::zero();
    ///
    /// let first = Population::<_, _, G>::with_seed(pop_config.clone(), genetic_config.clone(), 42).unwrap();
    /// let second = Population::<_, _, G>::with_seed(pop_config, genetic_config, 42).unwrap();
    ///
    /// assert!(first.genomes().eq(second.genomes()));
    /// ```
    pub fn with_seed(
        population_config: PopulationConfig,
        genetic_config: C,
        seed: u64,
    ) -> Result<Population<C, H, G>, ConfigError> {
        Self::with_rng(
            population_config,
            genetic_config,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        population_config: PopulationConfig,
        genetic_config: C,
        rng: ChaCha8Rng,
    ) -> Result<Population<C, H, G>, ConfigError> {
        population_config.validate()?;
        G::check_config(&genetic_config)?;

        let mut population = Population {
            species: vec![],
            history: H::new(&genetic_config),
            generation: 0,
            best_ever: None,
            population_config,
            genetic_config,
            rng,
        };
        let genomes = population.spawn_genomes();
        population.speciate(genomes);
        Ok(population)
    }

    /// Creates `population_config.size` fresh random genomes.
    fn spawn_genomes(&mut self) -> Vec<G> {
        (0..self.population_config.size.get())
            .map(|_| G::new(&self.genetic_config, &mut self.history, &mut self.rng))
            .collect()
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator.
    /// A NaN fitness is recorded as negative infinity.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Genome, Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero().with_size(NonZeroUsize::new(20).unwrap()),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// let mut fitness = 0.0;
    /// population.evaluate_fitness(move |_| {
    ///     fitness += 10.0;
    ///     fitness
    /// });
    ///
    /// assert_eq!(population.champion().fitness(), 20.0 * 10.0);
    /// ```
    pub fn evaluate_fitness<F>(&mut self, mut evaluator: F)
    where
        F: FnMut(&G) -> f32,
    {
        self.try_evaluate_fitness(|g| Ok::<f32, Infallible>(evaluator(g)))
            .unwrap_or_else(|never| match never {});
    }

    /// Evaluates the fitness of each genome in the population
    /// using a fallible evaluator. The first error is returned
    /// as-is, and leaves the rest of the generation unevaluated.
    /// A NaN fitness is recorded as negative infinity, the
    /// lowest possible fitness.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// let result = population.try_evaluate_fitness(|_| Err("simulator crashed"));
    /// assert_eq!(result, Err("simulator crashed"));
    /// ```
    pub fn try_evaluate_fitness<F, E>(&mut self, mut evaluator: F) -> Result<(), E>
    where
        F: FnMut(&G) -> Result<f32, E>,
    {
        for genome in self.species.iter_mut().flat_map(|s| &mut s.genomes) {
            let mut fitness = evaluator(genome)?;
            if fitness.is_nan() {
                warn!("fitness function returned NaN, using negative infinity");
                fitness = f32::NEG_INFINITY;
            }
            genome.set_fitness(fitness);
        }
        self.record_best_ever();
        Ok(())
    }

    /// Remembers the current champion if it beats every
    /// genome evaluated before.
    fn record_best_ever(&mut self) {
        let current = self
            .genomes()
            .max_by(|g1, g2| g1.fitness().total_cmp(&g2.fitness()));
        if let Some(current) = current {
            let improved = self
                .best_ever
                .as_ref()
                .map_or(true, |best| current.fitness() > best.fitness());
            if improved {
                self.best_ever = Some(current.clone());
            }
        }
    }

    /// Evolves the population by updating species statistics,
    /// excluding stagnant species, allotting offspring to the
    /// rest, breeding them, and speciating the result.
    ///
    /// Must be called after the current generation
    /// has been evaluated.
    ///
    /// # Errors
    /// Returns [`EvolutionError::Extinction`] if no species
    /// is eligible for reproduction. The population is left
    /// as it was, and can be [`reset`].
    ///
    /// [`reset`]: Population::reset
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero().with_size(NonZeroUsize::new(30).unwrap()),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// population.evaluate_fitness(|g| {
    ///     // Compute genome's fitness...
    ///     # 1.0
    /// });
    ///
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.genomes().count(), 30);
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        for species in &mut self.species {
            species.update_fitness(&self.population_config.speciation);
            species.share_fitness();
        }

        let reproducing = self.reproducing_species();
        if reproducing.iter().all(|r| !r) {
            warn!("all species stagnated in generation {}", self.generation);
            return Err(EvolutionError::Extinction {
                generation: self.generation,
            });
        }

        let mut index = 0;
        self.species.retain(|s| {
            let keep = reproducing[index];
            index += 1;
            if !keep {
                debug!(
                    "species {:?} removed after stagnating for {} generations",
                    s.id(),
                    s.time_stagnated()
                );
            }
            keep
        });

        let allotted = allot_offspring(
            &self
                .species
                .iter()
                .map(Species::mean_fitness)
                .collect::<Vec<_>>(),
            self.population_config.reproduction.population.get(),
            self.population_config.reproduction.min_species_size.get(),
        );
        debug!("offspring allotment: {:?}", allotted);

        for species in &mut self.species {
            species.sort_by_decreasing_fitness();
        }
        let offspring = OffspringFactory::new(
            &self.species,
            &mut self.history,
            &self.genetic_config,
            &self.population_config,
            &mut self.rng,
        )
        .generate_offspring(&allotted);

        self.generation += 1;
        self.speciate(offspring);
        Ok(())
    }

    /// Flags the species allowed to reproduce: those not stagnant
    /// for longer than allowed, and those holding a genome as fit
    /// as the best ever evaluated.
    fn reproducing_species(&self) -> Vec<bool> {
        let max_stagnation = self.population_config.reproduction.max_stagnation;
        let best_ever = self.best_ever.as_ref().map(|g| g.fitness());
        self.species
            .iter()
            .map(|s| {
                s.time_stagnated() <= max_stagnation
                    || best_ever.map_or(false, |best| s.max_fitness() >= best)
            })
            .collect()
    }

    /// Assigns each genome to the first species (in ID order) whose
    /// representative is within the compatibility threshold, founding
    /// new species for the rest. Representatives are then refreshed
    /// and species left without members are dropped.
    fn speciate(&mut self, genomes: Vec<G>) {
        for species in &mut self.species {
            species.genomes.clear();
        }

        let speciation = &self.population_config.speciation;
        let mut founded = 0;
        for mut genome in genomes {
            let compatible = self.species.iter().position(|s| {
                s.genetic_distance(&genome, speciation) <= speciation.compatibility_threshold
            });
            match compatible {
                Some(index) => {
                    let species = &mut self.species[index];
                    genome.set_species(Some(species.id()));
                    species.add_genome(genome);
                }
                None => {
                    let id = SpeciesID(self.generation, founded);
                    founded += 1;
                    genome.set_species(Some(id));
                    self.species.push(Species::new(id, genome));
                }
            }
        }

        self.species.retain(|s| !s.is_empty());
        for species in &mut self.species {
            species.refresh_representative();
        }
    }

    /// Replaces every genome with a fresh random one, and resets
    /// the innovation history. The generation counter keeps
    /// counting, and the best genome ever evaluated is kept.
    ///
    /// Used primarily in case of population extinction.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// // Evolve the population on some task, until
    /// // population.evolve() returns an Err.
    /// population.reset();
    /// assert_eq!(population.generation(), 1);
    /// ```
    pub fn reset(&mut self) {
        self.history = H::new(&self.genetic_config);
        self.species.clear();
        self.generation += 1;
        let genomes = self.spawn_genomes();
        self.speciate(genomes);
    }

    /// Runs the generation loop until the fitness criterion
    /// reaches the configured threshold, `generation_cap`
    /// generations have been evaluated, or the population
    /// goes extinct without [`reset_on_extinction`].
    ///
    /// # Errors
    /// Returns the first error produced by `fitness`, unchanged.
    ///
    /// [`reset_on_extinction`]: PopulationConfig::reset_on_extinction
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Genome, Population, PopulationConfig, TerminationReason};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// let mut config = PopulationConfig::zero().with_size(NonZeroUsize::new(10).unwrap());
    /// config.evaluation.fitness_threshold = 100.0;
    /// config.speciation.max_stagnation = 100;
    /// config.reproduction.max_stagnation = 100;
    ///
    /// let mut population = Population::<_, _, G>::with_seed(config, genetic_config, 1).unwrap();
    /// let summary = population
    ///     .run(|_| Ok::<_, ()>(1.0), NonZeroUsize::new(3))
    ///     .unwrap();
    ///
    /// assert_eq!(summary.reason, TerminationReason::GenerationCap);
    /// assert_eq!(summary.generations, 3);
    /// assert_eq!(summary.champion.fitness(), 1.0);
    /// ```
    pub fn run<F, E>(
        &mut self,
        mut fitness: F,
        generation_cap: Option<NonZeroUsize>,
    ) -> Result<RunSummary<G>, E>
    where
        F: FnMut(&G) -> Result<f32, E>,
    {
        let mut reports = vec![];
        let reason = loop {
            self.try_evaluate_fitness(&mut fitness)?;
            let report = GenerationReport::new(self);
            info!("{}", report);
            reports.push(report);

            let evaluation = &self.population_config.evaluation;
            let criterion = evaluation
                .fitness_criterion
                .evaluate(self.genomes().map(|g| g.fitness()));
            if criterion.map_or(false, |value| value >= evaluation.fitness_threshold) {
                break TerminationReason::FitnessThreshold;
            }
            if generation_cap.map_or(false, |cap| reports.len() >= cap.get()) {
                break TerminationReason::GenerationCap;
            }

            if let Err(EvolutionError::Extinction { generation }) = self.evolve() {
                if !self.population_config.reset_on_extinction {
                    break TerminationReason::Extinction;
                }
                warn!("resetting population after extinction in generation {}", generation);
                self.reset();
            }
        };

        info!(
            "run finished after {} generations: {:?}",
            reports.len(),
            reason
        );
        Ok(RunSummary {
            champion: self
                .best_ever
                .clone()
                .expect("an evaluated population has a champion"),
            generations: reports.len(),
            reason,
            reports,
        })
    }

    /// Returns the currently best-performing genome.
    pub fn champion(&self) -> &G {
        self.genomes()
            .max_by(|g1, g2| g1.fitness().total_cmp(&g2.fitness()))
            .expect("empty population has no champion")
    }

    /// Returns the fittest genome evaluated so far, across
    /// all generations and resets.
    pub fn best_ever(&self) -> Option<&G> {
        self.best_ever.as_ref()
    }

    /// Returns an iterator over all current genomes.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species.iter().flat_map(|s| s.genomes())
    }

    /// Returns an iterator over all current species.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// for species in population.species() {
    ///     println!(
    ///         "Species {:?} contains {} genomes",
    ///         species.id(),
    ///         species.len(),
    ///     );
    /// }
    /// ```
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the population's configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the genetic configuration shared by all genomes.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

/// Creates a population with `population_config` and `genetic_config`
/// and runs it (see [`Population::run`]).
///
/// # Errors
/// Returns [`RunError::Config`] if either configuration is invalid,
/// and [`RunError::Fitness`] with the fitness function's own error
/// if it fails.
pub fn run<G, F, E>(
    population_config: PopulationConfig,
    genetic_config: G::Config,
    fitness: F,
    generation_cap: Option<NonZeroUsize>,
) -> Result<RunSummary<G>, RunError<E>>
where
    G: Genome + Clone + PartialEq,
    F: FnMut(&G) -> Result<f32, E>,
{
    let mut population =
        Population::<G::Config, G::InnovationHistory, G>::new(population_config, genetic_config)?;
    population
        .run(fitness, generation_cap)
        .map_err(RunError::Fitness)
}

/// Splits `population` offspring among species proportionally to
/// their mean fitness. Fitness is shifted so that negative values
/// still yield a non-negative share, and species with an infinitely
/// low fitness get no share. When all shares are zero the split is
/// even. Each species is first given `min_species_size`
/// offspring, unless that alone would exceed the population.
/// The result always sums to `population`.
fn allot_offspring(
    species_fitness: &[f32],
    population: usize,
    min_species_size: usize,
) -> Vec<usize> {
    let count = species_fitness.len();
    if count == 0 {
        return vec![];
    }

    let offset = species_fitness
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(0.0f32, f32::min);
    let shares: Vec<f32> = species_fitness
        .iter()
        .map(|f| (f - offset).max(0.0))
        .collect();
    let total: f32 = shares.iter().sum();
    let shares: Vec<f32> = if total > 0.0 && total.is_finite() {
        shares.iter().map(|s| s / total).collect()
    } else {
        vec![1.0 / count as f32; count]
    };

    let values: Vec<f32> = if count * min_species_size >= population {
        vec![population as f32 / count as f32; count]
    } else {
        let spare = (population - count * min_species_size) as f32;
        shares
            .iter()
            .map(|share| min_species_size as f32 + share * spare)
            .collect()
    };
    round_retain_sum(&values, population)
}

/// Rounds all values to positive whole numbers
/// while preserving their order, and making them add up to `total`,
/// which is assumed to be the (whole) sum of `values`.
/// Rounding is done in the manner that minimizes
/// the average error to the original set of values.
fn round_retain_sum(values: &[f32], total: usize) -> Vec<usize> {
    let mut truncated: Vec<(usize, usize, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let u = f.max(0.0).floor();
            let e = f - u;
            (i, u as usize, e)
        })
        .collect();
    let truncated_sum: usize = truncated.iter().map(|(_, u, _)| *u).sum();
    let remainder: usize = total.saturating_sub(truncated_sum);
    // Sort in decreasing order of error
    truncated.sort_by(|a, b| b.2.total_cmp(&a.2));
    if !truncated.is_empty() {
        for k in 0..remainder {
            let len = truncated.len();
            truncated[k % len].1 += 1;
        }
    }
    truncated.sort_by_key(|(i, ..)| *i);
    truncated.iter().map(|(_, u, _)| *u).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::testing::{PointGenome, PointHistory};

    type PointPopulation = Population<f32, PointHistory, PointGenome>;

    fn config(size: usize) -> PopulationConfig {
        PopulationConfig {
            speciation: SpeciationConfig {
                compatibility_weight_coefficient: 1.0,
                compatibility_threshold: 0.5,
                max_stagnation: 3,
                survival_rate: 0.5,
                elitism: 1,
                stagnation_criterion: StagnationCriterion::Absolute,
                ..SpeciationConfig::zero()
            },
            reproduction: ReproductionConfig {
                crossover_rate: 0.5,
                max_stagnation: 3,
                survival_rate: 0.5,
                elitism: 1,
                ..ReproductionConfig::zero()
            },
            ..PopulationConfig::zero()
        }
        .with_size(NonZeroUsize::new(size).unwrap())
    }

    #[test]
    fn round_retain_sum() {
        let v = [
            5.2,
            9.5,
            2.8,
            1.3,
            2.2,
            2.7,
            6.3,
            1.0000000000001,
            0.9999999999999,
        ];
        let w = super::round_retain_sum(&v, 32);
        assert_eq!(w.iter().sum::<usize>(), 32);
        assert_eq!(w, [5, 10, 3, 1, 2, 3, 6, 1, 1]);
    }

    #[test]
    fn allotment_is_proportional() {
        assert_eq!(allot_offspring(&[3.0, 1.0], 10, 1), [7, 3]);
        assert_eq!(allot_offspring(&[0.0, 0.0, 0.0], 9, 1), [3, 3, 3]);
    }

    #[test]
    fn allotment_sums_to_population() {
        let fitnesses = [0.3, 12.0, -4.0, 7.7, 0.0, 1e-3, 2.5];
        for population in [7, 10, 33, 150, 1000] {
            for min_species_size in [1, 2, 5, 40] {
                let allotted = allot_offspring(&fitnesses, population, min_species_size);
                assert_eq!(allotted.len(), fitnesses.len());
                assert_eq!(allotted.iter().sum::<usize>(), population);
            }
        }
    }

    #[test]
    fn allotment_respects_minimum() {
        let allotted = allot_offspring(&[100.0, 0.0, 0.0], 30, 4);
        assert!(allotted.iter().all(|&n| n >= 4));
        assert_eq!(allotted.iter().sum::<usize>(), 30);
    }

    #[test]
    fn allotment_skips_infinitely_unfit_species() {
        let allotted = allot_offspring(&[f32::NEG_INFINITY, 2.0, 2.0], 10, 1);
        assert_eq!(allotted, [1, 5, 4]);
        let allotted = allot_offspring(&[f32::NEG_INFINITY; 3], 9, 1);
        assert_eq!(allotted, [3, 3, 3]);
    }

    #[test]
    fn nan_fitness_is_lowest() {
        let mut population = PointPopulation::with_seed(config(20), 0.05, 3).unwrap();
        let mut count = 0;
        population.evaluate_fitness(|_| {
            count += 1;
            if count % 2 == 0 {
                f32::NAN
            } else {
                1.0
            }
        });
        assert!(population.genomes().all(|g| !g.fitness().is_nan()));
        let lowest = population
            .genomes()
            .filter(|g| g.fitness() == f32::NEG_INFINITY)
            .count();
        assert_eq!(lowest, 10);
        assert_eq!(population.champion().fitness(), 1.0);

        population.evolve().unwrap();
        assert_eq!(population.genomes().count(), 20);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut population_config = config(10);
        population_config.reproduction.crossover_rate = 2.0;
        assert!(PointPopulation::new(population_config, 0.1).is_err());
        assert!(PointPopulation::new(config(10), -1.0).is_err());
    }

    #[test]
    fn population_size_is_kept() {
        let mut population = PointPopulation::with_seed(config(40), 0.05, 3).unwrap();
        for _ in 0..10 {
            population.evaluate_fitness(|g| 1.0 - g.position.abs());
            population.evolve().unwrap();
            assert_eq!(population.genomes().count(), 40);
            assert!(population.species().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn genomes_know_their_species() {
        let population = PointPopulation::with_seed(config(40), 0.05, 3).unwrap();
        for species in population.species() {
            assert!(species.genomes().all(|g| g.species() == Some(species.id())));
        }
    }

    #[test]
    fn same_seed_same_evolution() {
        let evolve = |seed| {
            let mut population = PointPopulation::with_seed(config(25), 0.1, seed).unwrap();
            for _ in 0..5 {
                population.evaluate_fitness(|g| -g.position.abs());
                population.evolve().unwrap();
            }
            population
                .genomes()
                .map(|g| g.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(evolve(11), evolve(11));
    }

    #[test]
    fn restored_population_evolves_identically() {
        let fitness = |g: &PointGenome| -g.position.abs();
        let mut population = PointPopulation::with_seed(config(25), 0.1, 4).unwrap();
        for _ in 0..3 {
            population.evaluate_fitness(fitness);
            population.evolve().unwrap();
        }

        let saved = serde_json::to_string(&population).unwrap();
        let mut restored: PointPopulation = serde_json::from_str(&saved).unwrap();
        assert_eq!(restored.generation(), population.generation());

        for _ in 0..3 {
            for population in [&mut population, &mut restored] {
                population.evaluate_fitness(fitness);
                population.evolve().unwrap();
            }
        }
        let positions = |p: &PointPopulation| p.genomes().map(|g| g.position).collect::<Vec<_>>();
        assert_eq!(positions(&restored), positions(&population));
    }

    #[test]
    fn stagnant_species_stop_reproducing() {
        let mut population = PointPopulation::with_seed(config(20), 0.0, 5).unwrap();
        // Two far-apart species with fixed fitness.
        let mut left = Species::new(SpeciesID(0, 0), PointGenome::at(-10.0));
        let mut right = Species::new(SpeciesID(0, 1), PointGenome::at(10.0));
        for _ in 1..10 {
            left.add_genome(PointGenome::at(-10.0));
            right.add_genome(PointGenome::at(10.0));
        }
        population.species = vec![left, right];

        let fitness = |g: &PointGenome| if g.position > 0.0 { 2.0 } else { 1.0 };
        population.evaluate_fitness(fitness);
        // The species' best fitness never improves after its first evaluation.
        for _ in 0..=3 {
            population.evolve().unwrap();
            population.evaluate_fitness(fitness);
        }
        assert_eq!(population.species().count(), 2);

        population.evolve().unwrap();
        // Only the species holding the best genome ever survives.
        assert_eq!(population.species().count(), 1);
        assert!(population.genomes().all(|g| g.position == 10.0));
        assert_eq!(population.genomes().count(), 20);
    }

    #[test]
    fn total_stagnation_is_extinction() {
        let mut population = PointPopulation::with_seed(config(10), 0.0, 5).unwrap();
        population.species = vec![{
            let mut s = Species::new(SpeciesID(0, 0), PointGenome::at(0.0));
            for _ in 1..10 {
                s.add_genome(PointGenome::at(0.0));
            }
            s
        }];

        let mut fitness = 10.0;
        let mut result = Ok(());
        for _ in 0..10 {
            population.evaluate_fitness(|_| {
                fitness -= 0.5;
                fitness
            });
            result = population.evolve();
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(EvolutionError::Extinction { .. })));
    }

    #[test]
    fn run_reaches_threshold() {
        let mut population_config = config(30);
        population_config.evaluation.fitness_threshold = 0.99;
        let mut population = PointPopulation::with_seed(population_config, 0.1, 9).unwrap();
        let summary = population
            .run(
                |g| Ok::<_, Infallible>(1.0 - g.position.abs()),
                NonZeroUsize::new(500),
            )
            .unwrap();
        assert_eq!(summary.reason, TerminationReason::FitnessThreshold);
        assert!(summary.champion.fitness() >= 0.99);
        assert_eq!(summary.reports.len(), summary.generations);
    }

    #[test]
    fn run_propagates_fitness_errors() {
        let mut population = PointPopulation::with_seed(config(5), 0.1, 9).unwrap();
        let result = population.run(|_| Err::<f32, _>("boom"), None);
        assert!(matches!(result, Err("boom")));
    }

    #[test]
    fn run_resets_after_extinction() {
        let mut population_config = config(10);
        population_config.speciation.max_stagnation = 0;
        population_config.reproduction.max_stagnation = 0;
        population_config.reset_on_extinction = true;
        population_config.evaluation.fitness_threshold = f32::INFINITY;
        // Without mutation no new species appear, so every second
        // generation goes extinct.
        let mut population = PointPopulation::with_seed(population_config, 0.0, 9).unwrap();

        let mut fitness = 100.0;
        let summary = population
            .run(
                |_| {
                    fitness -= 1.0;
                    Ok::<_, Infallible>(fitness)
                },
                NonZeroUsize::new(6),
            )
            .unwrap();
        assert_eq!(summary.reason, TerminationReason::GenerationCap);
        assert_eq!(summary.generations, 6);
        assert_eq!(summary.champion.fitness(), 99.0);
        assert_eq!(population.generation(), 5);
    }
}
