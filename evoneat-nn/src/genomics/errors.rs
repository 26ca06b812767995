use crate::{Innovation, NodeId};

use thiserror::Error;

/// A structural mutation could not be applied to a genome.
///
/// These are expected outcomes of random mutation,
/// and are only logged when they happen during
/// [`Genome::mutate`](evoneat::Genome::mutate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Every allowed pair of nodes is already connected.
    #[error("no pair of nodes can be connected")]
    NoValidConnection,
    /// There is no enabled connection to split.
    #[error("no enabled connection to split")]
    NoEnabledConnection,
    /// The genome has no connections.
    #[error("genome has no connections")]
    NoConnections,
    /// The genome has no hidden nodes.
    #[error("genome has no hidden nodes")]
    NoHiddenNodes,
    /// Every candidate would leave the outputs
    /// unreachable from the inputs.
    #[error("mutation would disconnect the outputs from the inputs")]
    WouldDisconnect,
}

/// A gene being manually added to a genome is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneValidityError {
    /// A node with the same identifier already exists.
    #[error("duplicate node insertion with id {0}")]
    DuplicateNode(NodeId),
    /// A connection with the same innovation number already exists.
    #[error("duplicate connection insertion with innovation {0}")]
    DuplicateInnovation(Innovation),
    /// A connection between the same nodes already exists.
    #[error("connection {input} -> {output} already exists with innovation {existing}")]
    DuplicateEndpoints {
        input: NodeId,
        output: NodeId,
        existing: Innovation,
    },
    /// A connection endpoint is not a node of the genome.
    #[error("connection endpoint {0} does not exist")]
    MissingEndpoint(NodeId),
    /// A connection targets a node whose value is not computed
    /// (an input or bias node).
    #[error("connection targets input or bias node {0}")]
    UncomputedTarget(NodeId),
}
