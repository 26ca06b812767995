//! A Genome is the focal element of evolution.
//!
//! An [`NNGenome`] encodes a neural network as a set of
//! [`NodeGene`]s, keyed by node identifier, and a set of
//! [`ConnectionGene`]s, keyed by innovation number. Innovation
//! numbers and the identifiers of nodes created by mutation are
//! handed out by a population-wide [`History`], so that the same
//! structural change made independently in two genomes yields
//! matching genes.
mod attributes;
mod config;
mod errors;
mod functions;
mod genes;
mod history;
mod mutation;
mod nodes;

pub use config::{ConnectionScheme, GeneticConfig};
pub use errors::{GeneValidityError, MutationError};
pub use functions::{ActivationType, AggregationType};
pub use genes::ConnectionGene;
pub use history::History;
pub use nodes::{NodeGene, NodeType};

use crate::graph;
use crate::{Innovation, NodeId};

use ahash::RandomState;
use evoneat::{Chance, ConfigError, Genome, SpeciationConfig, SpeciesID};
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Genomes below this many connections are compared without
/// normalizing the disjoint gene count by genome size.
const SMALL_GENOME_SIZE: usize = 20;

/// A neural network genome.
///
/// Nodes and connections are stored in identifier order,
/// which makes iteration (and thus every operation driven
/// by a seeded generator) deterministic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NNGenome {
    nodes: BTreeMap<NodeId, NodeGene>,
    connections: BTreeMap<Innovation, ConnectionGene>,
    fitness: f32,
    adjusted_fitness: f32,
    species: Option<SpeciesID>,
}

impl NNGenome {
    /// Creates a new genome with the configured input, output and
    /// hidden nodes, connected following the configuration's
    /// [`ConnectionScheme`]. Node biases and responses, and
    /// connection weights, are drawn from their initial distributions.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionScheme, GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     inputs: NonZeroUsize::new(3).unwrap(),
    ///     outputs: NonZeroUsize::new(2).unwrap(),
    ///     connection_scheme: ConnectionScheme::Full,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    ///
    /// let genome = NNGenome::new(&config, &mut history, &mut rng);
    ///
    /// assert_eq!(genome.nodes().count(), 5);
    /// assert_eq!(genome.connections().count(), 6);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        config: &GeneticConfig,
        history: &mut History,
        rng: &mut R,
    ) -> NNGenome {
        let inputs = config.inputs.get();
        let outputs = config.outputs.get();
        let mut genome = Self::empty();

        for (range, node_type) in [
            (0..inputs, NodeType::Input),
            (inputs..inputs + outputs, NodeType::Output),
            (
                inputs + outputs..inputs + outputs + config.hidden_nodes,
                NodeType::Hidden,
            ),
        ] {
            for id in range {
                genome.insert_node(Self::random_node(id, node_type, config, rng));
            }
        }

        let input_ids = 0..inputs;
        let output_ids = inputs..inputs + outputs;
        let hidden_ids = inputs + outputs..inputs + outputs + config.hidden_nodes;
        let cross = |from: std::ops::Range<NodeId>, to: std::ops::Range<NodeId>| {
            from.flat_map(move |i| to.clone().map(move |o| (i, o)))
        };

        let layered: Vec<(NodeId, NodeId)> = if config.hidden_nodes == 0 {
            cross(input_ids.clone(), output_ids.clone()).collect()
        } else {
            cross(input_ids.clone(), hidden_ids.clone())
                .chain(cross(hidden_ids, output_ids.clone()))
                .collect()
        };
        let pairs: Vec<(NodeId, NodeId)> = match config.connection_scheme {
            ConnectionScheme::Unconnected => vec![],
            ConnectionScheme::Full => layered,
            ConnectionScheme::FullDirect | ConnectionScheme::Partial(_) => {
                let mut pairs = layered;
                if config.hidden_nodes > 0 {
                    pairs.extend(cross(input_ids, output_ids));
                }
                pairs
            }
        };

        let weight = config.weight();
        for (input, output) in pairs {
            if let ConnectionScheme::Partial(probability) = config.connection_scheme {
                if !rng.chance(probability) {
                    continue;
                }
            }
            let mut gene = ConnectionGene::new(
                history.connection_innovation(input, output),
                input,
                output,
                weight.initial(rng),
            );
            gene.set_enabled(config.enabled_default);
            gene.set_frozen(config.frozen_default);
            genome.insert_connection(gene);
        }

        genome
    }

    /// Returns a genome with only the configured input and output
    /// nodes, and no connections. Nodes use the default activation
    /// and aggregation functions, and the mean initial bias and
    /// response. Useful for building genomes by hand.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    ///
    /// let genome = NNGenome::minimal(&GeneticConfig::zero());
    ///
    /// assert_eq!(genome.node(0).unwrap().node_type(), NodeType::Input);
    /// assert_eq!(genome.node(1).unwrap().node_type(), NodeType::Output);
    /// assert_eq!(genome.connections().count(), 0);
    /// ```
    pub fn minimal(config: &GeneticConfig) -> NNGenome {
        let inputs = config.inputs.get();
        let outputs = config.outputs.get();
        let mut genome = Self::empty();
        for id in 0..inputs + outputs {
            let node_type = if id < inputs {
                NodeType::Input
            } else {
                NodeType::Output
            };
            genome.insert_node(NodeGene::new(
                id,
                node_type,
                config.activator_default,
                config.aggregator_default,
                config.bias().default_value(),
                config.response().default_value(),
            ));
        }
        genome
    }

    fn empty() -> NNGenome {
        NNGenome {
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            fitness: 0.0,
            adjusted_fitness: 0.0,
            species: None,
        }
    }

    /// A node with the default functions and random bias and response.
    pub(crate) fn random_node<R: Rng + ?Sized>(
        id: NodeId,
        node_type: NodeType,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NodeGene {
        NodeGene::new(
            id,
            node_type,
            config.activator_default,
            config.aggregator_default,
            config.bias().initial(rng),
            config.response().initial(rng),
        )
    }

    /// Adds a node to the genome.
    ///
    /// # Errors
    /// Returns an error if a node with the same identifier exists.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{
    ///     ActivationType, AggregationType, GeneticConfig, NNGenome, NodeGene, NodeType,
    /// };
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig::zero());
    /// let hidden = NodeGene::new(
    ///     2,
    ///     NodeType::Hidden,
    ///     ActivationType::ReLU,
    ///     AggregationType::Sum,
    ///     0.0,
    ///     1.0,
    /// );
    ///
    /// assert!(genome.add_node(hidden.clone()).is_ok());
    /// assert!(genome.add_node(hidden).is_err());
    /// ```
    pub fn add_node(&mut self, node: NodeGene) -> Result<&mut NodeGene, GeneValidityError> {
        if self.nodes.contains_key(&node.id()) {
            return Err(GeneValidityError::DuplicateNode(node.id()));
        }
        Ok(self.insert_node(node))
    }

    /// Adds a connection to the genome.
    ///
    /// Recurrent connections are accepted; they are only
    /// rejected by feed-forward phenotypes.
    ///
    /// # Errors
    /// Returns an error if the innovation number or the
    /// endpoint pair is already present, if an endpoint
    /// does not exist, or if the connection targets an
    /// input or bias node.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionGene, GeneticConfig, GeneValidityError, NNGenome};
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig::zero());
    ///
    /// genome.add_connection(ConnectionGene::new(0, 0, 1, 0.5)).unwrap();
    ///
    /// assert_eq!(
    ///     genome.add_connection(ConnectionGene::new(1, 0, 1, 1.0)).unwrap_err(),
    ///     GeneValidityError::DuplicateEndpoints { input: 0, output: 1, existing: 0 },
    /// );
    /// assert!(genome.add_connection(ConnectionGene::new(2, 1, 0, 1.0)).is_err());
    /// assert!(genome.add_connection(ConnectionGene::new(3, 0, 7, 1.0)).is_err());
    /// ```
    pub fn add_connection(
        &mut self,
        gene: ConnectionGene,
    ) -> Result<&mut ConnectionGene, GeneValidityError> {
        if self.connections.contains_key(&gene.innovation()) {
            return Err(GeneValidityError::DuplicateInnovation(gene.innovation()));
        }
        let (input, output) = gene.endpoints();
        if let Some(existing) = self.connection_between(input, output) {
            return Err(GeneValidityError::DuplicateEndpoints {
                input,
                output,
                existing: existing.innovation(),
            });
        }
        for endpoint in [input, output] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GeneValidityError::MissingEndpoint(endpoint));
            }
        }
        if !self.nodes[&output].node_type().is_computed() {
            return Err(GeneValidityError::UncomputedTarget(output));
        }
        Ok(self.insert_connection(gene))
    }

    pub(crate) fn insert_node(&mut self, node: NodeGene) -> &mut NodeGene {
        let id = node.id();
        self.nodes.entry(id).or_insert(node)
    }

    pub(crate) fn insert_connection(&mut self, gene: ConnectionGene) -> &mut ConnectionGene {
        let innovation = gene.innovation();
        self.connections.entry(innovation).or_insert(gene)
    }

    /// Returns an iterator over the genome's nodes, in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeGene> {
        self.nodes.values()
    }

    /// Returns an iterator over the genome's connections,
    /// in innovation order.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.values()
    }

    /// Returns the node with identifier `id`.
    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.get(&id)
    }

    /// Returns the node with identifier `id`, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeGene> {
        self.nodes.get_mut(&id)
    }

    /// Returns the connection with innovation number `innovation`.
    pub fn connection(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections.get(&innovation)
    }

    /// Returns the connection with innovation number `innovation`, mutably.
    pub fn connection_mut(&mut self, innovation: Innovation) -> Option<&mut ConnectionGene> {
        self.connections.get_mut(&innovation)
    }

    /// Returns the connection from node `input` to node `output`.
    pub fn connection_between(&self, input: NodeId, output: NodeId) -> Option<&ConnectionGene> {
        self.connections
            .values()
            .find(|gene| gene.endpoints() == (input, output))
    }

    /// Returns the identifiers of nodes of type `node_type`, in order.
    pub fn node_ids(&self, node_type: NodeType) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.node_type() == node_type)
            .map(NodeGene::id)
            .collect()
    }

    /// Returns the genome's size as
    /// `(node count, enabled connection count)`.
    pub fn size(&self) -> (usize, usize) {
        (
            self.nodes.len(),
            self.connections.values().filter(|g| g.enabled()).count(),
        )
    }

    /// Endpoints of every connection, enabled or not.
    pub(crate) fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.connections.values().map(ConnectionGene::endpoints).collect()
    }

    /// Combines two genomes and returns a child genome.
    ///
    /// Connections present in both parents are inherited from either
    /// one at random, and are enabled with [`reenable_chance`] if
    /// disabled in either parent. Connections present only in
    /// `fitter` are always inherited. Connections present only in
    /// `other` are inherited with 50% chance when both parents are
    /// equally fit, provided they don't duplicate an inherited
    /// connection or, for feed-forward genomes, close a cycle.
    ///
    /// The child has every node of `fitter`, plus the nodes of
    /// `other` that its inherited connections need.
    ///
    /// [`reenable_chance`]: GeneticConfig::reenable_chance
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionScheme, GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     connection_scheme: ConnectionScheme::Full,
    ///     weight_init_stdev: 1.0,
    ///     weight_min_value: -5.0,
    ///     weight_max_value: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    ///
    /// let parent1 = NNGenome::new(&config, &mut history, &mut rng);
    /// let parent2 = NNGenome::new(&config, &mut history, &mut rng);
    ///
    /// let child = NNGenome::crossover(&parent1, &parent2, &config, &mut rng);
    /// let weight = child.connection(0).unwrap().weight();
    /// assert!(
    ///     weight == parent1.connection(0).unwrap().weight()
    ///         || weight == parent2.connection(0).unwrap().weight()
    /// );
    /// ```
    pub fn crossover<R: Rng + ?Sized>(
        fitter: &NNGenome,
        other: &NNGenome,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let tied = (fitter.fitness - other.fitness).abs() < f32::EPSILON;
        let mut child = Self::empty();
        child.nodes = fitter.nodes.clone();

        for (innovation, gene) in &fitter.connections {
            let inherited = match other.connections.get(innovation) {
                Some(other_gene) => {
                    let mut inherited = if rng.gen::<bool>() {
                        gene.clone()
                    } else {
                        other_gene.clone()
                    };
                    if (!gene.enabled() || !other_gene.enabled())
                        && rng.chance(config.reenable_chance)
                    {
                        inherited.set_enabled(true);
                    }
                    inherited
                }
                None => gene.clone(),
            };
            child.connections.insert(*innovation, inherited);
        }

        if tied {
            let mut pairs: HashSet<(NodeId, NodeId), RandomState> = child
                .connections
                .values()
                .map(ConnectionGene::endpoints)
                .collect();
            let mut edges = child.edges();

            for (innovation, gene) in &other.connections {
                if fitter.connections.contains_key(innovation) || !rng.gen::<bool>() {
                    continue;
                }
                let endpoints = gene.endpoints();
                if pairs.contains(&endpoints)
                    || (config.feed_forward && graph::creates_cycle(&edges, endpoints))
                {
                    continue;
                }
                for endpoint in [gene.input(), gene.output()] {
                    if !child.nodes.contains_key(&endpoint) {
                        if let Some(node) = other.nodes.get(&endpoint) {
                            child.insert_node(node.clone());
                        }
                    }
                }
                pairs.insert(endpoints);
                edges.push(endpoints);
                child.connections.insert(*innovation, gene.clone());
            }
        }

        child
    }

    /// Returns the compatibility distance between two genomes:
    /// `c_d × disjoint / N + c_w × mean weight difference`.
    ///
    /// Disjoint connections are those present in only one genome;
    /// the weight difference is averaged over connections present
    /// in both. `N` is the larger genome's connection count, or 1
    /// if both genomes are small.
    ///
    /// # Examples
    /// ```
    /// use evoneat::SpeciationConfig;
    /// use evoneat_nn::genomics::{ConnectionGene, GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     outputs: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut first = NNGenome::minimal(&config);
    /// first.add_connection(ConnectionGene::new(0, 0, 1, 1.0)).unwrap();
    /// let mut second = first.clone();
    /// second.connection_mut(0).unwrap().set_weight(2.5);
    /// second.add_connection(ConnectionGene::new(1, 0, 2, 1.0)).unwrap();
    ///
    /// let speciation = SpeciationConfig {
    ///     compatibility_disjoint_coefficient: 1.0,
    ///     compatibility_weight_coefficient: 0.5,
    ///     ..SpeciationConfig::zero()
    /// };
    /// assert_eq!(NNGenome::genetic_distance(&first, &second, &speciation), 1.75);
    /// ```
    pub fn genetic_distance(first: &NNGenome, second: &NNGenome, config: &SpeciationConfig) -> f32 {
        let mut matching = 0;
        let mut weight_difference = 0.0;
        let mut disjoint = 0;

        for (innovation, gene) in &first.connections {
            match second.connections.get(innovation) {
                Some(other) => {
                    matching += 1;
                    weight_difference += (gene.weight() - other.weight()).abs();
                }
                None => disjoint += 1,
            }
        }
        disjoint += second
            .connections
            .keys()
            .filter(|innovation| !first.connections.contains_key(innovation))
            .count();

        let largest = first.connections.len().max(second.connections.len());
        let normalization = if largest < SMALL_GENOME_SIZE {
            1.0
        } else {
            largest as f32
        };
        let mean_weight_difference = if matching == 0 {
            0.0
        } else {
            weight_difference / matching as f32
        };

        config.compatibility_disjoint_coefficient * disjoint as f32 / normalization
            + config.compatibility_weight_coefficient * mean_weight_difference
    }
}

impl PartialEq for NNGenome {
    /// Genomes are equal if their genes are; fitness
    /// and species bookkeeping is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.connections == other.connections
    }
}

impl Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = History;

    fn check_config(config: &GeneticConfig) -> Result<(), ConfigError> {
        config.validate()
    }

    fn new<R: Rng + ?Sized>(config: &GeneticConfig, history: &mut History, rng: &mut R) -> Self {
        Self::new(config, history, rng)
    }

    fn genetic_distance(first: &Self, second: &Self, config: &SpeciationConfig) -> f32 {
        Self::genetic_distance(first, second, config)
    }

    fn crossover<R: Rng + ?Sized>(
        parent1: &Self,
        parent2: &Self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Self {
        Self::crossover(parent1, parent2, config, rng)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        self.mutate(history, config, rng)
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

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fitness {:.4}", self.fitness)?;
        for node in self.nodes.values() {
            writeln!(f, "  {}", node)?;
        }
        for gene in self.connections.values() {
            writeln!(f, "  {}", gene)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::num::NonZeroUsize;

    fn config(scheme: ConnectionScheme, hidden_nodes: usize) -> GeneticConfig {
        GeneticConfig {
            inputs: NonZeroUsize::new(2).unwrap(),
            outputs: NonZeroUsize::new(2).unwrap(),
            hidden_nodes,
            connection_scheme: scheme,
            weight_init_stdev: 1.0,
            weight_min_value: -3.0,
            weight_max_value: 3.0,
            bias_init_stdev: 1.0,
            bias_min_value: -1.0,
            bias_max_value: 1.0,
            ..GeneticConfig::zero()
        }
    }

    fn speciation() -> SpeciationConfig {
        SpeciationConfig {
            compatibility_disjoint_coefficient: 1.0,
            compatibility_weight_coefficient: 0.4,
            ..SpeciationConfig::zero()
        }
    }

    fn generate(config: &GeneticConfig, seed: u64) -> NNGenome {
        let mut history = History::new(config);
        NNGenome::new(config, &mut history, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn connection_schemes() {
        let count = |scheme, hidden| generate(&config(scheme, hidden), 0).connections().count();
        assert_eq!(count(ConnectionScheme::Unconnected, 0), 0);
        assert_eq!(count(ConnectionScheme::Full, 0), 4);
        assert_eq!(count(ConnectionScheme::FullDirect, 0), 4);
        assert_eq!(count(ConnectionScheme::Full, 3), 12);
        assert_eq!(count(ConnectionScheme::FullDirect, 3), 16);
        assert_eq!(count(ConnectionScheme::Partial(1.0), 3), 16);
        assert_eq!(count(ConnectionScheme::Partial(0.0), 3), 0);
    }

    #[test]
    fn initial_nodes() {
        let genome = generate(&config(ConnectionScheme::Full, 3), 0);
        assert_eq!(genome.node_ids(NodeType::Input), [0, 1]);
        assert_eq!(genome.node_ids(NodeType::Output), [2, 3]);
        assert_eq!(genome.node_ids(NodeType::Hidden), [4, 5, 6]);
        for node in genome.nodes() {
            assert!((-1.0..=1.0).contains(&node.bias()));
            assert_eq!(node.response(), 1.0);
        }
        for gene in genome.connections() {
            assert!((-3.0..=3.0).contains(&gene.weight()));
            assert!(gene.enabled());
        }
    }

    #[test]
    fn initial_defaults() {
        let genome = generate(
            &GeneticConfig {
                enabled_default: false,
                frozen_default: true,
                ..config(ConnectionScheme::Full, 0)
            },
            0,
        );
        assert!(genome.connections().all(|g| !g.enabled() && g.frozen()));
    }

    #[test]
    fn genomes_share_innovations() {
        let config = config(ConnectionScheme::Full, 1);
        let mut history = History::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let first = NNGenome::new(&config, &mut history, &mut rng);
        let second = NNGenome::new(&config, &mut history, &mut rng);

        let endpoints = |g: &NNGenome| -> Vec<_> {
            g.connections
                .iter()
                .map(|(i, gene)| (*i, gene.endpoints()))
                .collect()
        };
        assert_eq!(endpoints(&first), endpoints(&second));
        assert_eq!(history.next_innovation(), 4);
    }

    #[test]
    fn uncomputed_target() {
        let mut genome = NNGenome::minimal(&GeneticConfig::zero());
        genome
            .add_node(NodeGene::new(
                2,
                NodeType::Bias,
                ActivationType::Identity,
                AggregationType::Sum,
                0.0,
                1.0,
            ))
            .unwrap();
        assert!(genome.add_connection(ConnectionGene::new(0, 2, 1, 1.0)).is_ok());
        assert_eq!(
            genome.add_connection(ConnectionGene::new(1, 0, 2, 1.0)),
            Err(GeneValidityError::UncomputedTarget(2))
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let config = config(ConnectionScheme::Partial(0.5), 4);
        for seed in 0..20 {
            let first = generate(&config, seed);
            let second = generate(&config, seed + 100);
            assert_eq!(
                NNGenome::genetic_distance(&first, &second, &speciation()),
                NNGenome::genetic_distance(&second, &first, &speciation()),
            );
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let genome = generate(&config(ConnectionScheme::FullDirect, 2), 1);
        assert_eq!(NNGenome::genetic_distance(&genome, &genome, &speciation()), 0.0);
    }

    #[test]
    fn distance_normalized_for_large_genomes() {
        let config = GeneticConfig {
            inputs: NonZeroUsize::new(5).unwrap(),
            outputs: NonZeroUsize::new(5).unwrap(),
            connection_scheme: ConnectionScheme::Full,
            ..GeneticConfig::zero()
        };
        let first = generate(&config, 0);
        let mut second = first.clone();
        second.connections.remove(&0);
        second.connections.remove(&1);

        // 25 genes in the largest genome, 2 disjoint, equal weights.
        let distance = NNGenome::genetic_distance(&first, &second, &speciation());
        assert!((distance - 2.0 / 25.0).abs() < 1e-6);
    }

    #[test]
    fn self_crossover_keeps_genes() {
        let config = config(ConnectionScheme::Partial(0.7), 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for seed in 0..10 {
            let genome = generate(&config, seed);
            let child = NNGenome::crossover(&genome, &genome, &config, &mut rng);
            assert_eq!(child, genome);
        }
    }

    #[test]
    fn crossover_drops_less_fit_disjoint_genes() {
        let config = config(ConnectionScheme::Unconnected, 0);
        let mut fitter = NNGenome::minimal(&config);
        fitter.add_connection(ConnectionGene::new(0, 0, 2, 1.0)).unwrap();
        fitter.set_fitness(2.0);
        let mut other = fitter.clone();
        other.add_connection(ConnectionGene::new(1, 1, 3, 1.0)).unwrap();
        other.set_fitness(1.0);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            let child = NNGenome::crossover(&fitter, &other, &config, &mut rng);
            assert!(child.connection(0).is_some());
            assert!(child.connection(1).is_none());
        }
    }

    #[test]
    fn tied_crossover_includes_other_genes_sometimes() {
        let config = config(ConnectionScheme::Unconnected, 0);
        let mut fitter = NNGenome::minimal(&config);
        fitter.add_connection(ConnectionGene::new(0, 0, 2, 1.0)).unwrap();
        let mut other = fitter.clone();
        other.add_connection(ConnectionGene::new(1, 1, 3, 1.0)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let included = (0..200)
            .filter(|_| {
                NNGenome::crossover(&fitter, &other, &config, &mut rng)
                    .connection(1)
                    .is_some()
            })
            .count();
        assert!((50..150).contains(&included), "{}", included);
    }

    #[test]
    fn tied_crossover_avoids_cycles() {
        let config = config(ConnectionScheme::Unconnected, 0);
        let hidden = |id| {
            NodeGene::new(
                id,
                NodeType::Hidden,
                ActivationType::Sigmoid,
                AggregationType::Sum,
                0.0,
                1.0,
            )
        };
        let mut fitter = NNGenome::minimal(&config);
        fitter.add_node(hidden(4)).unwrap();
        fitter.add_node(hidden(5)).unwrap();
        let mut other = fitter.clone();
        fitter.add_connection(ConnectionGene::new(0, 4, 5, 1.0)).unwrap();
        other.add_connection(ConnectionGene::new(1, 5, 4, 1.0)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            let child = NNGenome::crossover(&fitter, &other, &config, &mut rng);
            assert!(child.connection(1).is_none());
        }
    }

    #[test]
    fn crossover_brings_needed_nodes() {
        let config = config(ConnectionScheme::Unconnected, 0);
        let fitter = NNGenome::minimal(&config);
        let mut other = fitter.clone();
        other
            .add_node(NodeGene::new(
                9,
                NodeType::Hidden,
                ActivationType::Tanh,
                AggregationType::Sum,
                0.0,
                1.0,
            ))
            .unwrap();
        other.add_connection(ConnectionGene::new(3, 0, 9, 1.0)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let child = (0..50)
            .map(|_| NNGenome::crossover(&fitter, &other, &config, &mut rng))
            .find(|child| child.connection(3).is_some())
            .unwrap();
        assert_eq!(child.node(9).unwrap().activation(), ActivationType::Tanh);
    }

    #[test]
    fn reenabling() {
        let config = GeneticConfig {
            reenable_chance: 1.0,
            ..config(ConnectionScheme::Unconnected, 0)
        };
        let mut fitter = NNGenome::minimal(&config);
        fitter
            .add_connection(ConnectionGene::new(0, 0, 2, 1.0))
            .unwrap()
            .set_enabled(false);
        let other = fitter.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let child = NNGenome::crossover(&fitter, &other, &config, &mut rng);
        assert!(child.connection(0).unwrap().enabled());
    }

    #[test]
    fn equality_ignores_fitness() {
        let genome = generate(&config(ConnectionScheme::Full, 0), 0);
        let mut evaluated = genome.clone();
        evaluated.set_fitness(3.0);
        evaluated.set_species(Some(SpeciesID(0, 1)));
        assert_eq!(genome, evaluated);
    }
}
