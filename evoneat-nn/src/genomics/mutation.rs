use super::{
    ConnectionGene, GeneticConfig, History, MutationError, NNGenome, NodeGene, NodeType,
};
use crate::graph;
use crate::{Innovation, NodeId};

use evoneat::Chance;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use std::fmt;

impl NNGenome {
    /// Applies the configured mutations to the genome.
    ///
    /// Structural mutations run first, in the order node deletion,
    /// node addition, connection addition, connection deletion and
    /// connection toggling, each with its own independent chance.
    /// With [`alternative_structural_mutations`] at most one of them
    /// is applied. Then, with [`link_mutation_chance`] and
    /// [`node_mutation_chance`], connection and node attributes
    /// are mutated.
    ///
    /// Structural mutations which cannot be applied are skipped.
    ///
    /// [`alternative_structural_mutations`]: GeneticConfig::alternative_structural_mutations
    /// [`link_mutation_chance`]: GeneticConfig::link_mutation_chance
    /// [`node_mutation_chance`]: GeneticConfig::node_mutation_chance
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionScheme, GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     connection_scheme: ConnectionScheme::Full,
    ///     node_addition_chance: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    ///
    /// let mut genome = NNGenome::new(&config, &mut history, &mut rng);
    /// genome.mutate(&mut history, &config, &mut rng);
    ///
    /// assert_eq!(genome.size(), (3, 2));
    /// ```
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if config.alternative_structural_mutations {
            self.mutate_one_structure(history, config, rng);
        } else {
            if rng.chance(config.node_deletion_chance) {
                log_outcome("node deletion", self.mutate_delete_node(config, rng));
            }
            if rng.chance(config.node_addition_chance) {
                log_outcome("node addition", self.mutate_add_node(history, config, rng));
            }
            if rng.chance(config.link_addition_chance) {
                log_outcome(
                    "connection addition",
                    self.mutate_add_connection(history, config, rng),
                );
            }
            if rng.chance(config.link_deletion_chance) {
                log_outcome(
                    "connection deletion",
                    self.mutate_delete_connection(config, rng),
                );
            }
            if rng.chance(config.link_toggle_chance) {
                log_outcome(
                    "connection toggle",
                    self.mutate_toggle_connection(config, rng),
                );
            }
        }

        if rng.chance(config.link_mutation_chance) {
            self.mutate_connection_attributes(config, rng);
        }
        if rng.chance(config.node_mutation_chance) {
            self.mutate_node_attributes(config, rng);
        }
    }

    /// Picks at most one structural mutation, by roulette over
    /// the structural chances. If they add up to less than 1,
    /// the remainder is the chance of no structural mutation.
    fn mutate_one_structure<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        let chances = [
            config.node_deletion_chance,
            config.node_addition_chance,
            config.link_addition_chance,
            config.link_deletion_chance,
            config.link_toggle_chance,
        ];
        let total: f32 = chances.iter().sum();
        let mut roll = rng.gen::<f32>() * total.max(1.0);

        let mut chosen = None;
        for (operator, chance) in chances.iter().enumerate() {
            if roll < *chance {
                chosen = Some(operator);
                break;
            }
            roll -= chance;
        }

        match chosen {
            Some(0) => log_outcome("node deletion", self.mutate_delete_node(config, rng)),
            Some(1) => log_outcome("node addition", self.mutate_add_node(history, config, rng)),
            Some(2) => log_outcome(
                "connection addition",
                self.mutate_add_connection(history, config, rng),
            ),
            Some(3) => log_outcome(
                "connection deletion",
                self.mutate_delete_connection(config, rng),
            ),
            Some(4) => log_outcome(
                "connection toggle",
                self.mutate_toggle_connection(config, rng),
            ),
            _ => {}
        }
    }

    /// Splits a random enabled connection in two, with a new
    /// hidden node in between. The split connection is disabled;
    /// the connection into the new node has weight 1, clamped into
    /// the weight bounds, and the one out of it inherits the split
    /// connection's weight.
    ///
    /// Returns the new node's identifier.
    ///
    /// # Errors
    /// Returns an error if the genome has no enabled connections.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionGene, GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     weight_min_value: -5.0,
    ///     weight_max_value: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    ///
    /// let mut genome = NNGenome::minimal(&config);
    /// let innovation = history.connection_innovation(0, 1);
    /// genome.add_connection(ConnectionGene::new(innovation, 0, 1, 0.7)).unwrap();
    ///
    /// let node = genome.mutate_add_node(&mut history, &config, &mut rng).unwrap();
    ///
    /// assert!(!genome.connection(innovation).unwrap().enabled());
    /// assert_eq!(genome.connection_between(0, node).unwrap().weight(), 1.0);
    /// assert_eq!(genome.connection_between(node, 1).unwrap().weight(), 0.7);
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<NodeId, MutationError> {
        let split = self
            .connections
            .values()
            .filter(|gene| gene.enabled())
            .map(ConnectionGene::innovation)
            .collect::<Vec<_>>()
            .choose(rng)
            .copied()
            .ok_or(MutationError::NoEnabledConnection)?;

        let gene = self
            .connections
            .get_mut(&split)
            .expect("chosen connection belongs to the genome");
        gene.set_enabled(false);
        let (input, output, weight) = (gene.input(), gene.output(), gene.weight());

        let nodes = &self.nodes;
        let node = history.split_node(split, |id| nodes.contains_key(&id));
        self.insert_node(Self::random_node(node, NodeType::Hidden, config, rng));

        let unit = config.weight().clamp(1.0);
        for (from, to, weight) in [(input, node, unit), (node, output, weight)] {
            let mut gene =
                ConnectionGene::new(history.connection_innovation(from, to), from, to, weight);
            gene.set_frozen(config.frozen_default);
            self.insert_connection(gene);
        }

        Ok(node)
    }

    /// Removes a random hidden node and every connection touching it.
    ///
    /// Unless [`alternative_structural_mutations`] is set, nodes whose
    /// removal would leave every output unreachable from the inputs
    /// are not considered.
    ///
    /// Returns the removed node's identifier.
    ///
    /// [`alternative_structural_mutations`]: GeneticConfig::alternative_structural_mutations
    ///
    /// # Errors
    /// Returns an error if there is no hidden node to remove.
    pub fn mutate_delete_node<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<NodeId, MutationError> {
        let mut candidates = self.node_ids(NodeType::Hidden);
        if candidates.is_empty() {
            return Err(MutationError::NoHiddenNodes);
        }
        candidates.shuffle(rng);

        let guarded = !config.alternative_structural_mutations && self.io_connected(None, None);
        let node = candidates
            .into_iter()
            .find(|&node| !guarded || self.io_connected(None, Some(node)))
            .ok_or(MutationError::WouldDisconnect)?;

        self.nodes.remove(&node);
        self.connections
            .retain(|_, gene| gene.input() != node && gene.output() != node);
        Ok(node)
    }

    /// Adds a connection between a random pair of unconnected nodes,
    /// with a weight drawn from the initial distribution.
    ///
    /// Connections never end in input or bias nodes. In feed-forward
    /// genomes, they never start in output nodes nor close a cycle.
    ///
    /// Returns the new connection's innovation number.
    ///
    /// # Errors
    /// Returns an error if no pair of nodes can be connected.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History, MutationError, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut history = History::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::minimal(&config);
    ///
    /// assert!(genome.mutate_add_connection(&mut history, &config, &mut rng).is_ok());
    /// assert_eq!(
    ///     genome.mutate_add_connection(&mut history, &config, &mut rng),
    ///     Err(MutationError::NoValidConnection),
    /// );
    /// ```
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let edges = self.edges();
        let mut candidates: Vec<(NodeId, NodeId)> = self
            .nodes
            .values()
            .filter(|from| !(config.feed_forward && from.node_type() == NodeType::Output))
            .flat_map(|from| {
                self.nodes
                    .values()
                    .filter(|to| to.node_type().is_computed())
                    .map(move |to| (from.id(), to.id()))
            })
            .filter(|pair| !edges.contains(pair))
            .collect();
        candidates.shuffle(rng);

        let (input, output) = candidates
            .into_iter()
            .find(|&pair| !config.feed_forward || !graph::creates_cycle(&edges, pair))
            .ok_or(MutationError::NoValidConnection)?;

        let innovation = history.connection_innovation(input, output);
        let mut gene = ConnectionGene::new(innovation, input, output, config.weight().initial(rng));
        gene.set_frozen(config.frozen_default);
        self.insert_connection(gene);
        Ok(innovation)
    }

    /// Removes a random connection.
    ///
    /// Unless [`alternative_structural_mutations`] is set, connections
    /// whose removal would leave every output unreachable from the
    /// inputs are not considered.
    ///
    /// Returns the removed connection's innovation number.
    ///
    /// [`alternative_structural_mutations`]: GeneticConfig::alternative_structural_mutations
    ///
    /// # Errors
    /// Returns an error if there is no connection to remove.
    pub fn mutate_delete_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let innovation = self.choose_removable(config, rng, |_| true)?;
        self.connections.remove(&innovation);
        Ok(innovation)
    }

    /// Flips the enabled flag of a random connection.
    ///
    /// Unless [`alternative_structural_mutations`] is set, connections
    /// whose disabling would leave every output unreachable from the
    /// inputs are not considered.
    ///
    /// Returns the toggled connection's innovation number.
    ///
    /// [`alternative_structural_mutations`]: GeneticConfig::alternative_structural_mutations
    ///
    /// # Errors
    /// Returns an error if there is no connection to toggle.
    pub fn mutate_toggle_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let innovation = self.choose_removable(config, rng, |gene| gene.enabled())?;
        let gene = self
            .connections
            .get_mut(&innovation)
            .expect("chosen connection belongs to the genome");
        gene.set_enabled(!gene.enabled());
        Ok(innovation)
    }

    /// Chooses a random connection. Connections for which `removes`
    /// holds are only eligible if the genome stays connected
    /// without them, unless the guard is lifted.
    fn choose_removable<R, F>(
        &self,
        config: &GeneticConfig,
        rng: &mut R,
        removes: F,
    ) -> Result<Innovation, MutationError>
    where
        R: Rng + ?Sized,
        F: Fn(&ConnectionGene) -> bool,
    {
        let mut candidates: Vec<&ConnectionGene> = self.connections.values().collect();
        if candidates.is_empty() {
            return Err(MutationError::NoConnections);
        }
        candidates.shuffle(rng);

        let guarded = !config.alternative_structural_mutations && self.io_connected(None, None);
        candidates
            .into_iter()
            .find(|gene| {
                !guarded || !removes(gene) || self.io_connected(Some(gene.innovation()), None)
            })
            .map(ConnectionGene::innovation)
            .ok_or(MutationError::WouldDisconnect)
    }

    /// Mutates every connection's weight (unless frozen or disabled),
    /// and flips enabled and frozen flags with their configured chances.
    pub fn mutate_connection_attributes<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        let weight = config.weight();
        let innovations: Vec<Innovation> = self.connections.keys().copied().collect();

        for innovation in innovations {
            let guarded = !config.alternative_structural_mutations;
            let disconnects = |genome: &NNGenome| {
                guarded
                    && genome.io_connected(None, None)
                    && !genome.io_connected(Some(innovation), None)
            };

            if rng.chance(config.enabled_mutation_chance) {
                let enabled = self.connections[&innovation].enabled();
                if !enabled || !disconnects(self) {
                    if let Some(gene) = self.connections.get_mut(&innovation) {
                        gene.set_enabled(!enabled);
                    }
                }
            }

            let gene = self
                .connections
                .get_mut(&innovation)
                .expect("connection attributes mutate in place");
            if rng.chance(config.frozen_mutation_chance) {
                gene.set_frozen(!gene.frozen());
            }
            if gene.enabled() && !gene.frozen() {
                gene.set_weight(weight.mutated(gene.weight(), rng));
            }
        }
    }

    /// Mutates the bias and response of every hidden and output node,
    /// and replaces their activation and aggregation functions with
    /// a different configured option with their configured chances.
    pub fn mutate_node_attributes<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        let bias = config.bias();
        let response = config.response();

        for node in self
            .nodes
            .values_mut()
            .filter(|node| node.node_type().is_computed())
        {
            node.set_bias(bias.mutated(node.bias(), rng));
            node.set_response(response.mutated(node.response(), rng));

            if rng.chance(config.activator_mutation_chance) {
                if let Some(activation) =
                    alternative(&config.activator_options, node.activation(), rng)
                {
                    node.set_activation(activation);
                }
            }
            if rng.chance(config.aggregator_mutation_chance) {
                if let Some(aggregation) =
                    alternative(&config.aggregator_options, node.aggregation(), rng)
                {
                    node.set_aggregation(aggregation);
                }
            }
        }
    }

    /// Returns whether any output is reachable from any input or bias
    /// node through enabled connections, ignoring connection
    /// `without_connection` and node `without_node`.
    pub(crate) fn io_connected(
        &self,
        without_connection: Option<Innovation>,
        without_node: Option<NodeId>,
    ) -> bool {
        let edges: Vec<(NodeId, NodeId)> = self
            .connections
            .values()
            .filter(|gene| gene.enabled() && Some(gene.innovation()) != without_connection)
            .map(ConnectionGene::endpoints)
            .filter(|&(from, to)| Some(from) != without_node && Some(to) != without_node)
            .collect();
        let sources: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| matches!(node.node_type(), NodeType::Input | NodeType::Bias))
            .map(NodeGene::id)
            .collect();
        graph::path_exists(&edges, &sources, &self.node_ids(NodeType::Output))
    }
}

/// A uniformly chosen option different from `current`.
fn alternative<T, R>(options: &[T], current: T, rng: &mut R) -> Option<T>
where
    T: Copy + PartialEq,
    R: Rng + ?Sized,
{
    let others: Vec<T> = options.iter().copied().filter(|&o| o != current).collect();
    others.choose(rng).copied()
}

fn log_outcome<T: fmt::Debug>(operator: &str, outcome: Result<T, MutationError>) {
    match outcome {
        Ok(result) => trace!("{} applied: {:?}", operator, result),
        Err(e) => trace!("{} skipped: {}", operator, e),
    }
}
