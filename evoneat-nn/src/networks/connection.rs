use std::fmt;

/// A weighted incoming connection of a network node,
/// referring to its source by value slot.
#[derive(Clone, Copy, PartialEq)]
pub(super) struct Connection {
    pub input: usize,
    pub weight: f32,
}

impl Connection {
    /// Creates a new Connection with the specified
    /// input slot and weight.
    pub fn new(input: usize, weight: f32) -> Connection {
        Connection { input, weight }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.input, self.weight)
    }
}

/// A node scheduled for evaluation: the value slot it writes,
/// its incoming connections, and how it combines them.
#[derive(Clone, Debug)]
pub(super) struct NodeEvaluation {
    pub slot: usize,
    pub node: crate::genomics::NodeGene,
    pub inputs: Box<[Connection]>,
}

impl NodeEvaluation {
    /// Computes the node's value from the current `values`,
    /// using `buffer` as scratch space for weighted inputs.
    pub fn evaluate(&self, values: &[f32], buffer: &mut Vec<f32>) -> f32 {
        buffer.clear();
        buffer.extend(self.inputs.iter().map(|c| values[c.input] * c.weight));
        self.node.evaluate(buffer)
    }
}
