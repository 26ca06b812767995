use super::{PopulationConfig, Species};

use crate::{Chance, Genome};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating a population's
/// offspring according to the specified configs
/// and allotted offspring.
///
/// Species members must be sorted by decreasing fitness.
pub(super) struct OffspringFactory<'a, G: Genome, R: ?Sized> {
    species: &'a [Species<G>],
    history: &'a mut G::InnovationHistory,
    genetic_config: &'a G::Config,
    population_config: &'a PopulationConfig,
    rng: &'a mut R,
}

impl<'a, G, R> OffspringFactory<'a, G, R>
where
    G: Genome + Clone + PartialEq,
    R: Rng + ?Sized,
{
    pub(super) fn new(
        species: &'a [Species<G>],
        history: &'a mut G::InnovationHistory,
        genetic_config: &'a G::Config,
        population_config: &'a PopulationConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, G, R> {
        OffspringFactory {
            species,
            history,
            genetic_config,
            population_config,
            rng,
        }
    }

    /// Generate the allotted offspring, species by species.
    pub(super) fn generate_offspring(&mut self, allotted_offspring: &[usize]) -> Vec<G> {
        let all_species = self.species;
        let mut offspring = Vec::with_capacity(allotted_offspring.iter().sum());

        for (species_index, &allotted) in allotted_offspring.iter().enumerate() {
            let species = &all_species[species_index];
            let elite = species
                .count_elite(&self.population_config.reproduction)
                .min(allotted);
            debug!(
                "species {:?}: {} offspring ({} elite)",
                species.id(),
                allotted,
                elite
            );

            offspring.extend_from_slice(&species.genomes[..elite]);
            for _ in elite..allotted {
                offspring.push(self.breed(species_index));
            }
        }

        offspring
    }

    /// Produces one child of the species' breeding stock,
    /// through crossover or cloning, and mutates it.
    fn breed(&mut self, species_index: usize) -> G {
        let reproduction = &self.population_config.reproduction;
        let stock = self.breeding_stock(species_index);
        let parent1 = Self::choose_parent(stock, &mut *self.rng);

        let mut child = if self.rng.chance(reproduction.crossover_rate) {
            let parent2 = self.choose_second_parent(species_index);
            if parent1.fitness() >= parent2.fitness() {
                G::crossover(parent1, parent2, self.genetic_config, &mut *self.rng)
            } else {
                G::crossover(parent2, parent1, self.genetic_config, &mut *self.rng)
            }
        } else {
            parent1.clone()
        };

        child.mutate(&mut *self.history, self.genetic_config, &mut *self.rng);
        child.set_fitness(0.0);
        child.set_adjusted_fitness(0.0);
        child
    }

    /// Choose a parent from the current species,
    /// or from another randomly selected.
    fn choose_second_parent(&mut self, species_index: usize) -> &'a G {
        let species = self.species;
        let other_species = if species.len() > 1
            && self
                .rng
                .chance(self.population_config.reproduction.inter_species_crossover_rate)
        {
            let other = self.rng.gen_range(0..species.len() - 1);
            if other >= species_index {
                other + 1
            } else {
                other
            }
        } else {
            species_index
        };
        let stock = self.breeding_stock(other_species);
        Self::choose_parent(stock, &mut *self.rng)
    }

    /// The top members of a species, which are allowed to mate.
    fn breeding_stock(&self, species_index: usize) -> &'a [G] {
        let all_species: &'a [Species<G>] = self.species;
        let species = &all_species[species_index];
        let survivors = species.count_survivors(&self.population_config.reproduction);
        &species.genomes[..survivors]
    }

    fn choose_parent(stock: &'a [G], rng: &mut R) -> &'a G {
        stock
            .choose(rng)
            .expect("reproducing species have at least one member")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::testing::PointGenome;
    use crate::populations::{ReproductionConfig, SpeciesID};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn species(id: usize, fitnesses: &[f32]) -> Species<PointGenome> {
        let mut genomes = fitnesses.iter().enumerate().map(|(i, f)| {
            let mut g = PointGenome::at(id as f32 * 10.0 + i as f32);
            g.set_fitness(*f);
            g
        });
        let mut species = Species::new(SpeciesID(0, id), genomes.next().unwrap());
        for g in genomes {
            species.add_genome(g);
        }
        species
    }

    #[test]
    fn allotted_counts_and_elites() {
        let all = [species(0, &[5.0, 4.0, 3.0, 2.0]), species(1, &[1.0, 0.5])];
        let config = PopulationConfig {
            reproduction: ReproductionConfig {
                elitism: 2,
                elitism_threshold: 3,
                survival_rate: 0.5,
                ..ReproductionConfig::zero()
            },
            ..PopulationConfig::zero()
        };
        let mut history = crate::genome::testing::PointHistory;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let offspring = OffspringFactory::new(&all, &mut history, &0.0, &config, &mut rng)
            .generate_offspring(&[6, 3]);

        assert_eq!(offspring.len(), 9);
        // Elites of the first species keep their fitness.
        assert_eq!(offspring[0].fitness(), 5.0);
        assert_eq!(offspring[1].fitness(), 4.0);
        // Zero mutation step: children are clones of the top half.
        for child in &offspring[2..6] {
            assert!(child.position == 0.0 || child.position == 1.0);
            assert_eq!(child.fitness(), 0.0);
        }
        // The second species is below the elitism threshold.
        for child in &offspring[6..] {
            assert_eq!(child.position, 10.0);
            assert_eq!(child.fitness(), 0.0);
        }
    }

    #[test]
    fn crossover_with_other_species() {
        let all = [species(0, &[1.0]), species(1, &[1.0])];
        let config = PopulationConfig {
            reproduction: ReproductionConfig {
                crossover_rate: 1.0,
                inter_species_crossover_rate: 1.0,
                survival_rate: 1.0,
                ..ReproductionConfig::zero()
            },
            ..PopulationConfig::zero()
        };
        let mut history = crate::genome::testing::PointHistory;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let offspring = OffspringFactory::new(&all, &mut history, &0.0, &config, &mut rng)
            .generate_offspring(&[2, 0]);

        assert!(offspring.iter().all(|g| g.position == 5.0));
    }
}
