use crate::populations::{ReproductionConfig, SpeciationConfig};
use crate::Genome;

use serde::{Deserialize, Serialize};

use std::collections::VecDeque;

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// generated in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpeciesID(pub usize, pub usize);

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// genomes. Membership is determined by calculating
/// the genetic distance to a _representative_.
/// The representative is kept across generations
/// as long as it survives; otherwise the first
/// member of the species takes its place.
///
/// A species stagnates when its best fitness fails to
/// improve; after [`max_stagnation`] generations of
/// stagnation it stops reproducing.
///
/// [genetic distance]: SpeciationConfig::compatibility_threshold
/// [`max_stagnation`]: ReproductionConfig::max_stagnation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species<G> {
    id: SpeciesID,
    pub(super) genomes: Vec<G>,
    representative: G,
    stagnation: usize,
    best_fitness: Option<f32>,
    fitness_history: VecDeque<f32>,
}

impl<G: Genome + Clone + PartialEq> Species<G> {
    /// Creates a new species with the specified ID and
    /// representative. The representative is also added
    /// to the species' genome pool.
    pub fn new(id: SpeciesID, representative: G) -> Species<G> {
        Species {
            id,
            genomes: vec![representative.clone()],
            representative,
            stagnation: 0,
            best_fitness: None,
            fitness_history: VecDeque::new(),
        }
    }

    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the species' representative.
    pub fn representative(&self) -> &G {
        &self.representative
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance(&self, other: &G, config: &SpeciationConfig) -> f32 {
        G::genetic_distance(&self.representative, other, config)
    }

    /// Adds a genome to the species.
    pub fn add_genome(&mut self, genome: G) {
        self.genomes.push(genome);
    }

    /// Keeps the current representative if it is still
    /// a member, otherwise promotes the first member.
    pub(super) fn refresh_representative(&mut self) {
        if self.genomes.contains(&self.representative) {
            return;
        }
        if let Some(first) = self.genomes.first() {
            self.representative = first.clone();
        }
    }

    /// Records the species' current maximum fitness and
    /// updates its stagnation counter. A species' first
    /// evaluation always counts as an improvement.
    pub(super) fn update_fitness(&mut self, config: &SpeciationConfig) {
        let current = self.max_fitness();
        let improved = match self.best_fitness {
            None => true,
            Some(best) => config.stagnation_criterion.is_improvement(current, best),
        };
        if improved {
            self.best_fitness = Some(current);
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        self.fitness_history.push_back(current);
        while self.fitness_history.len() > config.max_stagnation.max(1) {
            self.fitness_history.pop_front();
        }
    }

    /// Assigns each member its share of the species'
    /// fitness (explicit fitness sharing).
    pub(super) fn share_fitness(&mut self) {
        let members = self.genomes.len() as f32;
        for genome in &mut self.genomes {
            let shared = genome.fitness() / members;
            genome.set_adjusted_fitness(shared);
        }
    }

    /// Returns the highest fitness among current members.
    pub fn max_fitness(&self) -> f32 {
        self.genomes
            .iter()
            .map(|g| g.fitness())
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Returns the species' mean fitness, which
    /// equals the sum of its members' adjusted fitness.
    pub fn mean_fitness(&self) -> f32 {
        self.genomes.iter().map(|g| g.fitness()).sum::<f32>() / self.genomes.len() as f32
    }

    /// Returns the best fitness the species ever reached.
    pub fn best_fitness(&self) -> Option<f32> {
        self.best_fitness
    }

    /// Returns the maximum fitness of the most recent
    /// generations, oldest first.
    pub fn fitness_history(&self) -> impl Iterator<Item = f32> + '_ {
        self.fitness_history.iter().copied()
    }

    /// Returns the number of generations the species
    /// has gone without improving.
    pub fn time_stagnated(&self) -> usize {
        self.stagnation
    }

    /// Returns an iterator over the species' members.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.genomes.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Returns whether the species has no members.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the currently best-performing genome.
    ///
    /// # Panics
    /// Panics if the species is empty.
    pub fn champion(&self) -> &G {
        self.genomes
            .iter()
            .max_by(|g1, g2| g1.fitness().total_cmp(&g2.fitness()))
            .expect("empty species has no champion")
    }

    /// Sorts members by fitness in descending order.
    pub(super) fn sort_by_decreasing_fitness(&mut self) {
        self.genomes
            .sort_by(|g1, g2| g2.fitness().total_cmp(&g1.fitness()));
    }

    /// Number of members copied unchanged into the next generation.
    pub(super) fn count_elite(&self, config: &ReproductionConfig) -> usize {
        if self.genomes.len() >= config.elitism_threshold {
            self.genomes.len().min(config.elitism)
        } else {
            0
        }
    }

    /// Number of top members eligible as parents; never zero.
    pub(super) fn count_survivors(&self, config: &ReproductionConfig) -> usize {
        let survivors = (self.genomes.len() as f32 * config.survival_rate).ceil() as usize;
        survivors.clamp(1, self.genomes.len().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::testing::PointGenome;
    use crate::populations::StagnationCriterion;

    fn point(position: f32, fitness: f32) -> PointGenome {
        let mut genome = PointGenome::at(position);
        genome.set_fitness(fitness);
        genome
    }

    fn speciation() -> SpeciationConfig {
        SpeciationConfig {
            max_stagnation: 3,
            ..SpeciationConfig::zero()
        }
    }

    #[test]
    fn first_evaluation_is_improvement() {
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 1.0));
        species.update_fitness(&speciation());
        assert_eq!(species.time_stagnated(), 0);
        assert_eq!(species.best_fitness(), Some(1.0));
    }

    #[test]
    fn stagnation_counts_and_resets() {
        let config = speciation();
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 1.0));
        species.update_fitness(&config);
        species.update_fitness(&config);
        species.update_fitness(&config);
        assert_eq!(species.time_stagnated(), 2);

        species.genomes[0].set_fitness(2.0);
        species.update_fitness(&config);
        assert_eq!(species.time_stagnated(), 0);
        assert_eq!(species.best_fitness(), Some(2.0));
    }

    #[test]
    fn min_growth_stagnation() {
        let config = SpeciationConfig {
            stagnation_criterion: StagnationCriterion::MinGrowth { growth: 1.0 },
            ..speciation()
        };
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 1.0));
        species.update_fitness(&config);
        species.genomes[0].set_fitness(1.5);
        species.update_fitness(&config);
        assert_eq!(species.time_stagnated(), 1);
        assert_eq!(species.best_fitness(), Some(1.0));
    }

    #[test]
    fn fitness_history_is_bounded() {
        let config = speciation();
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 0.0));
        for f in 0..6 {
            species.genomes[0].set_fitness(f as f32);
            species.update_fitness(&config);
        }
        assert_eq!(species.fitness_history().collect::<Vec<_>>(), [3.0, 4.0, 5.0]);
    }

    #[test]
    fn shared_fitness() {
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 3.0));
        species.add_genome(point(0.1, 6.0));
        species.share_fitness();
        let adjusted: Vec<f32> = species.genomes().map(|g| g.adjusted_fitness()).collect();
        assert_eq!(adjusted, [1.5, 3.0]);
        assert_eq!(species.mean_fitness(), 4.5);
    }

    #[test]
    fn representative_survives_or_is_replaced() {
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 0.0));
        species.genomes = vec![point(0.5, 0.0), point(0.0, 9.0)];
        species.refresh_representative();
        assert_eq!(species.representative().position, 0.0);

        species.genomes = vec![point(0.7, 0.0), point(0.8, 0.0)];
        species.refresh_representative();
        assert_eq!(species.representative().position, 0.7);
    }

    #[test]
    fn elite_requires_threshold() {
        let mut species = Species::new(SpeciesID(0, 0), point(0.0, 0.0));
        species.add_genome(point(0.1, 0.0));
        let config = ReproductionConfig {
            elitism: 1,
            elitism_threshold: 3,
            survival_rate: 0.2,
            ..ReproductionConfig::zero()
        };
        assert_eq!(species.count_elite(&config), 0);
        species.add_genome(point(0.2, 0.0));
        assert_eq!(species.count_elite(&config), 1);
        assert_eq!(species.count_survivors(&config), 1);
    }
}
