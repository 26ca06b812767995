use crate::genomics::{ActivationType, AggregationType};
use crate::NodeId;

use serde::{Deserialize, Serialize};

use std::fmt;

/// A NodeType indicates the function of
/// the node's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Input nodes, whose value is set from outside the network.
    Input,
    /// Output nodes.
    Output,
    /// Hidden nodes.
    Hidden,
    /// Constant nodes, always emitting 1.
    Bias,
}

impl NodeType {
    /// Whether nodes of this type take incoming connections
    /// and compute their value from them.
    pub fn is_computed(self) -> bool {
        matches!(self, NodeType::Output | NodeType::Hidden)
    }
}

/// Nodes are the structural elements of genomes
/// between which connections are created.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NodeGene {
    id: NodeId,
    node_type: NodeType,
    activation: ActivationType,
    aggregation: AggregationType,
    bias: f32,
    response: f32,
}

impl NodeGene {
    /// Generate a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, AggregationType, NodeGene, NodeType};
    ///
    /// let node = NodeGene::new(
    ///     5,
    ///     NodeType::Hidden,
    ///     ActivationType::Sigmoid,
    ///     AggregationType::Sum,
    ///     0.0,
    ///     1.0,
    /// );
    /// assert_eq!(node.id(), 5);
    /// ```
    pub fn new(
        id: NodeId,
        node_type: NodeType,
        activation: ActivationType,
        aggregation: AggregationType,
        bias: f32,
        response: f32,
    ) -> NodeGene {
        NodeGene {
            id,
            node_type,
            activation,
            aggregation,
            bias,
            response,
        }
    }

    /// Computes the node's output from its weighted inputs:
    /// `activation(aggregation(inputs) × response + bias)`.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, AggregationType, NodeGene, NodeType};
    ///
    /// let node = NodeGene::new(
    ///     2,
    ///     NodeType::Output,
    ///     ActivationType::Identity,
    ///     AggregationType::Sum,
    ///     0.5,
    ///     2.0,
    /// );
    /// assert_eq!(node.evaluate(&[1.0, 2.0]), 6.5);
    /// ```
    pub fn evaluate(&self, inputs: &[f32]) -> f32 {
        self.activation
            .activate(self.aggregation.aggregate(inputs) * self.response + self.bias)
    }

    /// Returns the node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's type.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns the node's activation function.
    pub fn activation(&self) -> ActivationType {
        self.activation
    }

    /// Sets the node's activation function.
    pub fn set_activation(&mut self, activation: ActivationType) {
        self.activation = activation;
    }

    /// Returns the node's aggregation function.
    pub fn aggregation(&self) -> AggregationType {
        self.aggregation
    }

    /// Sets the node's aggregation function.
    pub fn set_aggregation(&mut self, aggregation: AggregationType) {
        self.aggregation = aggregation;
    }

    /// Returns the node's bias.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Sets the node's bias.
    pub fn set_bias(&mut self, bias: f32) {
        self.bias = bias;
    }

    /// Returns the node's response multiplier.
    pub fn response(&self) -> f32 {
        self.response
    }

    /// Sets the node's response multiplier.
    pub fn set_response(&mut self, response: f32) {
        self.response = response;
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{:?}, {:?}, {:?}, bias {:.3}, response {:.3}]",
            self.id, self.node_type, self.activation, self.aggregation, self.bias, self.response,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_types() {
        assert!(NodeType::Hidden.is_computed());
        assert!(NodeType::Output.is_computed());
        assert!(!NodeType::Input.is_computed());
        assert!(!NodeType::Bias.is_computed());
    }

    #[test]
    fn evaluate_without_inputs() {
        let node = NodeGene::new(
            0,
            NodeType::Hidden,
            ActivationType::Sigmoid,
            AggregationType::Sum,
            0.0,
            1.0,
        );
        assert_eq!(node.evaluate(&[]), 0.5);
    }

    #[test]
    fn display() {
        let node = NodeGene::new(
            3,
            NodeType::Output,
            ActivationType::Tanh,
            AggregationType::Max,
            0.25,
            1.0,
        );
        assert_eq!(
            node.to_string(),
            "3[Output, Tanh, Max, bias 0.250, response 1.000]"
        );
    }
}
