use super::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// The configuration is split in the same sections
/// a NEAT experiment description usually has: global
/// settings, speciation, evaluation and reproduction.
/// Some values (population size, survival rate and
/// elitism) appear in two sections; they must agree,
/// which is checked by [`validate`].
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Whether a population that goes extinct (no species
    /// remains eligible for reproduction) is re-created from
    /// scratch, or the run ends with an extinction failure.
    pub reset_on_extinction: bool,
    /// Speciation parameters.
    pub speciation: SpeciationConfig,
    /// Termination parameters.
    pub evaluation: EvaluationConfig,
    /// Offspring generation parameters.
    pub reproduction: ReproductionConfig,
}

/// Parameters controlling how genomes are clustered
/// into species and how species are judged stagnant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciationConfig {
    /// Weight of non-matching genes in genetic distance.
    pub compatibility_disjoint_coefficient: f32,
    /// Weight of the mean weight difference of matching
    /// genes in genetic distance.
    pub compatibility_weight_coefficient: f32,
    /// Genetic distance threshold, beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub compatibility_threshold: f32,
    /// Length of the fitness history kept by each species.
    /// Must equal [`ReproductionConfig::max_stagnation`].
    pub max_stagnation: usize,
    /// Top fraction of each species retained as breeding stock.
    pub survival_rate: f32,
    /// Top n of each species which is copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// What counts as an improvement of a species' best fitness.
    pub stagnation_criterion: StagnationCriterion,
}

/// Parameters controlling run termination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// A run terminates once the population's
    /// [`fitness_criterion`] reaches this value.
    ///
    /// [`fitness_criterion`]: EvaluationConfig::fitness_criterion
    pub fitness_threshold: f32,
    /// How a generation's fitness values are reduced
    /// to the single value compared against the threshold.
    pub fitness_criterion: FitnessCriterion,
}

/// Parameters controlling offspring generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Chance that an offspring is produced by crossover
    /// (as opposed to a mutated clone of one parent).
    pub crossover_rate: f32,
    /// Chance that the second crossover parent is drawn
    /// from a different species.
    pub inter_species_crossover_rate: f32,
    /// Number of offspring generated each generation.
    pub population: NonZeroUsize,
    /// Number of generations without improvement after
    /// which a species stops reproducing.
    pub max_stagnation: usize,
    /// Top fraction of each species retained as breeding stock.
    pub survival_rate: f32,
    /// Top n of each species which is copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// Minimum member count a species needs for its
    /// elite to be carried over.
    pub elitism_threshold: usize,
    /// Minimum number of offspring allotted to each
    /// reproducing species.
    pub min_species_size: NonZeroUsize,
}

/// Reduction of a generation's fitness values
/// used for termination checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessCriterion {
    Max,
    Min,
    Mean,
}

/// Rule deciding whether a species improved
/// on its best recorded fitness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StagnationCriterion {
    /// Any increase of the best fitness counts.
    Absolute,
    /// The best fitness must grow by more than `growth`.
    MinGrowth { growth: f32 },
}

impl FitnessCriterion {
    /// Reduces `fitnesses` to a single value.
    /// Returns `None` for an empty sequence.
    ///
    /// # Examples
    /// ```
    /// use evoneat::FitnessCriterion;
    ///
    /// let fitnesses = [1.0, 4.0, 2.5];
    /// assert_eq!(FitnessCriterion::Max.evaluate(fitnesses.iter().copied()), Some(4.0));
    /// assert_eq!(FitnessCriterion::Min.evaluate(fitnesses.iter().copied()), Some(1.0));
    /// assert_eq!(FitnessCriterion::Mean.evaluate(fitnesses.iter().copied()), Some(2.5));
    /// ```
    pub fn evaluate(&self, fitnesses: impl Iterator<Item = f32>) -> Option<f32> {
        let mut count = 0usize;
        let mut reduced: Option<f32> = None;
        for fitness in fitnesses {
            count += 1;
            reduced = Some(match (self, reduced) {
                (_, None) => fitness,
                (FitnessCriterion::Max, Some(r)) => r.max(fitness),
                (FitnessCriterion::Min, Some(r)) => r.min(fitness),
                (FitnessCriterion::Mean, Some(r)) => r + fitness,
            });
        }
        match self {
            FitnessCriterion::Mean => reduced.map(|sum| sum / count as f32),
            _ => reduced,
        }
    }
}

impl StagnationCriterion {
    /// Returns whether `current` improves on `best`.
    pub fn is_improvement(&self, current: f32, best: f32) -> bool {
        match self {
            StagnationCriterion::Absolute => current > best,
            StagnationCriterion::MinGrowth { growth } => current - best > *growth,
        }
    }
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. Fitness is reduced with
    /// [`FitnessCriterion::Max`], and stagnation is
    /// judged with [`StagnationCriterion::Absolute`].
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{PopulationConfig, SpeciationConfig};
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     reset_on_extinction: true,
    ///     speciation: SpeciationConfig {
    ///         compatibility_threshold: 3.0,
    ///         ..SpeciationConfig::zero()
    ///     },
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// assert!(cfg2.validate().is_ok());
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: ONE,
            reset_on_extinction: false,
            speciation: SpeciationConfig::zero(),
            evaluation: EvaluationConfig {
                fitness_threshold: 0.0,
                fitness_criterion: FitnessCriterion::Max,
            },
            reproduction: ReproductionConfig::zero(),
        }
    }

    /// Sets the population size in both places it appears.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let size = NonZeroUsize::new(150).unwrap();
    /// let config = PopulationConfig::zero().with_size(size);
    ///
    /// assert_eq!(config.size, size);
    /// assert_eq!(config.reproduction.population, size);
    /// ```
    pub fn with_size(mut self, size: NonZeroUsize) -> PopulationConfig {
        self.size = size;
        self.reproduction.population = size;
        self
    }

    /// Checks that every value lies in its valid range and that
    /// values mirrored in two sections agree.
    ///
    /// # Errors
    /// Returns the first problem found.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{ConfigError, PopulationConfig, ReproductionConfig};
    ///
    /// let config = PopulationConfig {
    ///     reproduction: ReproductionConfig {
    ///         crossover_rate: 1.5,
    ///         ..ReproductionConfig::zero()
    ///     },
    ///     ..PopulationConfig::zero()
    /// };
    ///
    /// assert!(matches!(
    ///     config.validate(),
    ///     Err(ConfigError::ProbabilityOutOfRange { .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speciation = &self.speciation;
        let reproduction = &self.reproduction;

        check_non_negative(
            "compatibility_disjoint_coefficient",
            speciation.compatibility_disjoint_coefficient,
        )?;
        check_non_negative(
            "compatibility_weight_coefficient",
            speciation.compatibility_weight_coefficient,
        )?;
        check_non_negative("compatibility_threshold", speciation.compatibility_threshold)?;
        check_probability("speciation.survival_rate", speciation.survival_rate)?;
        if let StagnationCriterion::MinGrowth { growth } = speciation.stagnation_criterion {
            check_non_negative("stagnation_criterion.growth", growth)?;
        }

        if self.evaluation.fitness_threshold.is_nan() {
            return Err(ConfigError::NotANumber {
                name: "fitness_threshold",
            });
        }

        check_probability("crossover_rate", reproduction.crossover_rate)?;
        check_probability(
            "inter_species_crossover_rate",
            reproduction.inter_species_crossover_rate,
        )?;
        check_probability("reproduction.survival_rate", reproduction.survival_rate)?;

        check_mirrored("population", self.size, reproduction.population)?;
        check_mirrored("survival_rate", speciation.survival_rate, reproduction.survival_rate)?;
        check_mirrored("elitism", speciation.elitism, reproduction.elitism)?;
        check_mirrored(
            "max_stagnation",
            speciation.max_stagnation,
            reproduction.max_stagnation,
        )?;
        Ok(())
    }
}

impl SpeciationConfig {
    /// Returns a "zero-valued" speciation configuration.
    pub const fn zero() -> SpeciationConfig {
        SpeciationConfig {
            compatibility_disjoint_coefficient: 0.0,
            compatibility_weight_coefficient: 0.0,
            compatibility_threshold: 0.0,
            max_stagnation: 0,
            survival_rate: 0.0,
            elitism: 0,
            stagnation_criterion: StagnationCriterion::Absolute,
        }
    }
}

impl ReproductionConfig {
    /// Returns a "zero-valued" reproduction configuration.
    pub const fn zero() -> ReproductionConfig {
        ReproductionConfig {
            crossover_rate: 0.0,
            inter_species_crossover_rate: 0.0,
            population: ONE,
            max_stagnation: 0,
            survival_rate: 0.0,
            elitism: 0,
            elitism_threshold: 0,
            min_species_size: ONE,
        }
    }
}

// SAFETY: 1 is a valid NonZeroUsize. Replace this with
// NonZeroUsize::new(1).unwrap() once const Option::unwrap
// becomes stable.
const ONE: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(1) };

/// Checks that `value` is a probability.
///
/// # Examples
/// ```
/// use evoneat::check_probability;
///
/// assert!(check_probability("chance", 0.25).is_ok());
/// assert!(check_probability("chance", -0.1).is_err());
/// assert!(check_probability("chance", f32::NAN).is_err());
/// ```
pub fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

/// Checks that `value` is a finite, non-negative number.
pub fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Checks that the `[min, max]` interval is well-formed.
pub fn check_bounds(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_nan() || max.is_nan() {
        Err(ConfigError::NotANumber { name })
    } else if min > max {
        Err(ConfigError::InvertedBounds { name, min, max })
    } else {
        Ok(())
    }
}

fn check_mirrored<T>(name: &'static str, first: T, second: T) -> Result<(), ConfigError>
where
    T: PartialEq + ToString,
{
    if first == second {
        Ok(())
    } else {
        Err(ConfigError::Mismatch {
            name,
            first: first.to_string(),
            second: second.to_string(),
        })
    }
}
