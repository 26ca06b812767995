use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeId};

use ahash::RandomState;
use evoneat::InnovationHistory;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};

/// A `History` keeps track of connection and node innovations in a
/// population, in order to make sure identical mutations
/// are assigned the same identifiers.
///
/// For connection innovations the input and output nodes are used to
/// identify identical mutations, and the corresponding innovation
/// number is recorded.
///
/// For node innovations the split connection is used to identify
/// identical mutations, and the identifiers of the nodes created by
/// splitting it are recorded. The connections to and from the new
/// node then follow from its identifier.
///
/// Input, output and initial hidden node identifiers are reserved
/// on creation: inputs come first, then outputs, then hidden nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    next_innovation: Innovation,
    next_node_id: NodeId,
    connections: HashMap<(NodeId, NodeId), Innovation, RandomState>,
    splits: HashMap<Innovation, Vec<NodeId>, RandomState>,
}

impl InnovationHistory for History {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> History {
        Self::new(config)
    }
}

impl History {
    /// Creates a new History using the specified configuration.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let history = History::new(&GeneticConfig {
    ///     inputs: NonZeroUsize::new(3).unwrap(),
    ///     hidden_nodes: 2,
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// // Nodes 0..3 are inputs, 3 is the output, 4 and 5 are hidden.
    /// assert_eq!(history.next_node_id(), 6);
    /// assert_eq!(history.next_innovation(), 0);
    /// ```
    pub fn new(config: &GeneticConfig) -> History {
        History {
            next_innovation: 0,
            next_node_id: config.inputs.get() + config.outputs.get() + config.hidden_nodes,
            connections: HashMap::default(),
            splits: HashMap::default(),
        }
    }

    /// Returns the innovation number of the connection between
    /// `input` and `output`, registering it if it is new.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// let first = history.connection_innovation(0, 1);
    /// let second = history.connection_innovation(1, 1);
    ///
    /// assert_ne!(first, second);
    /// assert_eq!(history.connection_innovation(0, 1), first);
    /// ```
    pub fn connection_innovation(&mut self, input: NodeId, output: NodeId) -> Innovation {
        match self.connections.entry((input, output)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let innovation = self.next_innovation;
                self.next_innovation += 1;
                *entry.insert(innovation)
            }
        }
    }

    /// Returns the identifier of the node created by splitting the
    /// connection with innovation number `split`.
    ///
    /// The first node previously recorded for this split for which
    /// `present` returns `false` is reused. If the genome already
    /// holds every recorded node (it split the same connection
    /// before), a new node is registered.
    pub(crate) fn split_node(
        &mut self,
        split: Innovation,
        mut present: impl FnMut(NodeId) -> bool,
    ) -> NodeId {
        let nodes = self.splits.entry(split).or_default();
        if let Some(&node) = nodes.iter().find(|&&node| !present(node)) {
            return node;
        }
        let node = self.next_node_id;
        self.next_node_id += 1;
        nodes.push(node);
        node
    }

    /// Returns the next connection innovation number to be assigned.
    pub fn next_innovation(&self) -> Innovation {
        self.next_innovation
    }

    /// Returns the next node identifier to be assigned.
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    /// Returns an iterator over the complete record of
    /// connection innovations, in the format
    /// `((input node, output node), innovation)`.
    /// No ordering is guaranteed.
    pub fn connection_history(&self) -> impl Iterator<Item = (&(NodeId, NodeId), &Innovation)> {
        self.connections.iter()
    }

    /// Returns an iterator over the complete record of
    /// node innovations, in the format
    /// `(split connection, nodes created by splitting it)`.
    /// No ordering is guaranteed.
    pub fn split_history(&self) -> impl Iterator<Item = (&Innovation, &[NodeId])> {
        self.splits
            .iter()
            .map(|(split, nodes)| (split, nodes.as_slice()))
    }
}
