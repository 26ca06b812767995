//! A Network is the phenotype of a genome: an evaluable
//! computation graph with the genome's enabled connections
//! as weighted edges. Disabled connections are ignored.
//!
//! Every computed (hidden or output) node takes the value
//! `activation(aggregation(weighted inputs) × response + bias)`.
//! Input nodes take the values passed in, and bias nodes are
//! constant at 1.
//!
//! The [`FeedForwardNetwork`] type evaluates acyclic genomes in
//! a single pass, in topological order. The [`RecurrentNetwork`]
//! type accepts any genome and updates every node synchronously
//! at each time step; it is best suited for real-time control
//! tasks, with new inputs set for each activation.
mod connection;
mod feed_forward;
mod recurrent;

pub use feed_forward::FeedForwardNetwork;
pub use recurrent::RecurrentNetwork;

use crate::genomics::{GeneticConfig, NNGenome, NodeGene, NodeType};
use crate::NodeId;
use connection::{Connection, NodeEvaluation};

use ahash::RandomState;
use thiserror::Error;

use std::collections::HashMap;

/// A network could not be built or evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The genome's enabled connections form a cycle,
    /// which a feed-forward network cannot evaluate.
    #[error("enabled connections form a cycle")]
    Cycle,
    /// The number of inputs passed does not match the network's.
    #[error("expected {expected} inputs, got {actual}")]
    InputCount { expected: usize, actual: usize },
}

/// A phenotype of either kind, chosen by
/// [`feed_forward`](GeneticConfig::feed_forward).
#[derive(Clone, Debug)]
pub enum Network {
    FeedForward(FeedForwardNetwork),
    Recurrent(RecurrentNetwork),
}

impl Network {
    /// Builds a feed-forward network if genomes are configured
    /// to be feed-forward, and a recurrent network otherwise.
    ///
    /// # Errors
    /// Returns [`NetworkError::Cycle`] if a feed-forward genome
    /// has a cycle.
    pub fn new(genome: &NNGenome, config: &GeneticConfig) -> Result<Network, NetworkError> {
        Ok(if config.feed_forward {
            Network::FeedForward(FeedForwardNetwork::new(genome)?)
        } else {
            Network::Recurrent(RecurrentNetwork::new(genome))
        })
    }

    /// Returns the network's outputs for `inputs`.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputCount`] if the number of
    /// inputs is wrong.
    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        match self {
            Network::FeedForward(network) => network.evaluate(inputs),
            Network::Recurrent(network) => network.evaluate(inputs),
        }
    }
}

/// Builds the phenotype of `genome` (see [`Network::new`])
/// and evaluates it at `inputs`.
///
/// # Errors
/// Returns an error if the network cannot be built, or the
/// number of inputs is wrong.
///
/// # Examples
/// ```
/// use evoneat_nn::genomics::{ActivationType, ConnectionGene, GeneticConfig, NNGenome};
/// use evoneat_nn::networks;
///
/// let config = GeneticConfig {
///     activator_default: ActivationType::Identity,
///     ..GeneticConfig::zero()
/// };
/// let mut genome = NNGenome::minimal(&config);
/// genome.add_connection(ConnectionGene::new(0, 0, 1, -2.0)).unwrap();
///
/// assert_eq!(networks::evaluate(&genome, &[1.5], &config).unwrap(), [-3.0]);
/// assert!(networks::evaluate(&genome, &[1.5, 2.0], &config).is_err());
/// ```
pub fn evaluate(
    genome: &NNGenome,
    inputs: &[f32],
    config: &GeneticConfig,
) -> Result<Vec<f32>, NetworkError> {
    Network::new(genome, config)?.evaluate(inputs)
}

/// Value slot assignment shared by both network types:
/// every genome node gets one slot, in identifier order.
#[derive(Clone, Debug)]
struct Layout {
    slots: HashMap<NodeId, usize, RandomState>,
    inputs: Box<[usize]>,
    outputs: Box<[usize]>,
    biases: Box<[usize]>,
}

impl Layout {
    fn new(genome: &NNGenome) -> Layout {
        let slots: HashMap<NodeId, usize, RandomState> = genome
            .nodes()
            .enumerate()
            .map(|(slot, node)| (node.id(), slot))
            .collect();
        let slots_of = |node_type| -> Box<[usize]> {
            genome
                .node_ids(node_type)
                .iter()
                .map(|id| slots[id])
                .collect()
        };
        Layout {
            inputs: slots_of(NodeType::Input),
            outputs: slots_of(NodeType::Output),
            biases: slots_of(NodeType::Bias),
            slots,
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// The evaluation step of a computed node, with its
    /// enabled incoming connections.
    fn evaluation(&self, genome: &NNGenome, node: &NodeGene) -> NodeEvaluation {
        let inputs = genome
            .connections()
            .filter(|gene| gene.enabled() && gene.output() == node.id())
            .map(|gene| Connection::new(self.slots[&gene.input()], gene.weight()))
            .collect();
        NodeEvaluation {
            slot: self.slots[&node.id()],
            node: node.clone(),
            inputs,
        }
    }

    /// Checks the input count and returns fresh values
    /// with inputs and biases set.
    fn initial_values(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.inputs.len() {
            return Err(NetworkError::InputCount {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        let mut values = vec![0.0; self.len()];
        for (&slot, &value) in self.inputs.iter().zip(inputs) {
            values[slot] = value;
        }
        for &slot in self.biases.iter() {
            values[slot] = 1.0;
        }
        Ok(values)
    }

    fn outputs(&self, values: &[f32]) -> Vec<f32> {
        self.outputs.iter().map(|&slot| values[slot]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ActivationType, AggregationType, ConnectionGene};

    #[test]
    fn network_kind_follows_config() {
        let config = GeneticConfig::zero();
        let mut genome = NNGenome::minimal(&config);
        genome.add_connection(ConnectionGene::new(0, 1, 1, 1.0)).unwrap();

        assert_eq!(Network::new(&genome, &config).unwrap_err(), NetworkError::Cycle);

        let recurrent = GeneticConfig {
            feed_forward: false,
            ..GeneticConfig::zero()
        };
        assert!(matches!(
            Network::new(&genome, &recurrent),
            Ok(Network::Recurrent(_))
        ));
    }

    #[test]
    fn layout_slots() {
        let mut genome = NNGenome::minimal(&GeneticConfig::zero());
        genome
            .add_node(NodeGene::new(
                7,
                NodeType::Bias,
                ActivationType::Identity,
                AggregationType::Sum,
                0.0,
                1.0,
            ))
            .unwrap();
        let layout = Layout::new(&genome);
        assert_eq!(&*layout.inputs, [0]);
        assert_eq!(&*layout.outputs, [1]);
        assert_eq!(&*layout.biases, [2]);
        assert_eq!(layout.initial_values(&[0.3]).unwrap(), [0.3, 0.0, 1.0]);
        assert_eq!(
            layout.initial_values(&[]),
            Err(NetworkError::InputCount {
                expected: 1,
                actual: 0
            })
        );
    }
}
