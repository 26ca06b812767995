use super::{Layout, NetworkError, NodeEvaluation};
use crate::genomics::{NNGenome, NodeType};
use crate::{graph, NodeId};

/// A network evaluated in a single pass over its nodes,
/// in topological order. Nodes that cannot influence any
/// output are never computed.
///
/// Evaluation is pure: a network holds no state between calls.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    layout: Layout,
    evaluations: Box<[NodeEvaluation]>,
}

impl FeedForwardNetwork {
    /// Builds the network expressed by `genome`.
    ///
    /// # Errors
    /// Returns [`NetworkError::Cycle`] if the genome's
    /// enabled connections form a cycle.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ConnectionGene, GeneticConfig, NNGenome};
    /// use evoneat_nn::networks::{FeedForwardNetwork, NetworkError};
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig::zero());
    /// genome.add_connection(ConnectionGene::new(0, 0, 1, 1.0)).unwrap();
    /// assert!(FeedForwardNetwork::new(&genome).is_ok());
    ///
    /// genome.add_connection(ConnectionGene::new(1, 1, 1, 1.0)).unwrap();
    /// assert_eq!(FeedForwardNetwork::new(&genome).unwrap_err(), NetworkError::Cycle);
    /// ```
    pub fn new(genome: &NNGenome) -> Result<FeedForwardNetwork, NetworkError> {
        let node_ids: Vec<NodeId> = genome.nodes().map(|node| node.id()).collect();
        let edges: Vec<(NodeId, NodeId)> = genome
            .connections()
            .filter(|gene| gene.enabled())
            .map(|gene| gene.endpoints())
            .collect();

        let order = graph::topological_order(&node_ids, &edges).ok_or(NetworkError::Cycle)?;
        let required = graph::required_for_output(&edges, &genome.node_ids(NodeType::Output));

        let layout = Layout::new(genome);
        let evaluations = order
            .into_iter()
            .filter(|id| required.contains(id))
            .filter_map(|id| genome.node(id))
            .filter(|node| node.node_type().is_computed())
            .map(|node| layout.evaluation(genome, node))
            .collect();

        Ok(FeedForwardNetwork {
            layout,
            evaluations,
        })
    }

    /// Returns the network's outputs for `inputs`, in
    /// output node identifier order. Inputs are assigned
    /// to input nodes in identifier order.
    ///
    /// # Errors
    /// Returns [`NetworkError::InputCount`] if `inputs` does
    /// not hold exactly one value per input node.
    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        let mut values = self.layout.initial_values(inputs)?;
        let mut buffer = Vec::new();
        for evaluation in self.evaluations.iter() {
            values[evaluation.slot] = evaluation.evaluate(&values, &mut buffer);
        }
        Ok(self.layout.outputs(&values))
    }

    /// Returns the number of inputs the network takes.
    pub fn input_count(&self) -> usize {
        self.layout.inputs.len()
    }

    /// Returns the number of outputs the network produces.
    pub fn output_count(&self) -> usize {
        self.layout.outputs.len()
    }
}
