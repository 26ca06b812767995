use super::Population;

use crate::{Genome, InnovationHistory};

use serde::{Deserialize, Serialize};

use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields all-zero statistics.
    ///
    /// # Examples
    /// ```
    /// use evoneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
    /// assert_eq!(stats.median, 2.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        data.sort_by(f32::total_cmp);

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// A summary of one evaluated generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub species: usize,
    pub fitness: Stats,
}

impl GenerationReport {
    /// Summarizes the population's current, evaluated, generation.
    pub fn new<C, H, G>(population: &Population<C, H, G>) -> GenerationReport
    where
        G: Genome<InnovationHistory = H, Config = C> + Clone + PartialEq,
        H: InnovationHistory<Config = C>,
    {
        GenerationReport {
            generation: population.generation(),
            species: population.species().count(),
            fitness: Stats::from(population.genomes().map(|g| g.fitness())),
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: {} species, fitness max {:.4} / mean {:.4} / median {:.4} / min {:.4}",
            self.generation,
            self.species,
            self.fitness.maximum,
            self.fitness.mean,
            self.fitness.median,
            self.fitness.minimum,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        assert_eq!(Stats::from(std::iter::empty()).mean, 0.0);
    }

    #[test]
    fn single_value_stats() {
        let stats = Stats::from(std::iter::once(3.0));
        assert_eq!(
            stats,
            Stats {
                maximum: 3.0,
                minimum: 3.0,
                mean: 3.0,
                median: 3.0
            }
        );
    }

    #[test]
    fn report_serializes() {
        let report = GenerationReport {
            generation: 12,
            species: 4,
            fitness: Stats::from([0.25, 3.5, -1.0].iter().copied()),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"generation\":12"));
        let restored: GenerationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, report);
    }
}
