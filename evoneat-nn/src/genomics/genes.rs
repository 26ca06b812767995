use crate::{Innovation, NodeId};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Connection genes are the principal components of genomes.
/// They are created between two nodes, and become
/// weighted network connections in the genome's phenotype.
///
/// A disabled connection is kept in the genome, but not
/// expressed in its phenotype. A frozen connection keeps
/// its weight during mutation.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConnectionGene {
    innovation: Innovation,
    input: NodeId,
    output: NodeId,
    weight: f32,
    enabled: bool,
    frozen: bool,
}

impl ConnectionGene {
    /// Returns a new enabled, unfrozen, gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::ConnectionGene;
    ///
    /// let gene = ConnectionGene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// assert_eq!(gene.input(), 3);
    /// assert_eq!(gene.output(), 9);
    /// assert_eq!(gene.weight(), 2.0);
    /// assert!(gene.enabled());
    /// assert!(!gene.frozen());
    /// ```
    pub fn new(innovation: Innovation, input: NodeId, output: NodeId, weight: f32) -> ConnectionGene {
        ConnectionGene {
            innovation,
            input,
            output,
            weight,
            enabled: true,
            frozen: false,
        }
    }

    /// Returns the gene's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Returns the gene's input node's identifier.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Returns the gene's output node's identifier.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Returns the gene's input and output node identifiers.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.input, self.output)
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the gene's weight
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::ConnectionGene;
    ///
    /// let mut gene = ConnectionGene::new(42, 3, 9, 2.0);
    /// gene.set_weight(-5.0);
    ///
    /// assert_eq!(gene.weight(), -5.0);
    /// ```
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    /// Returns whether the gene is expressed in the phenotype.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the gene's expression status.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::ConnectionGene;
    ///
    /// let mut gene = ConnectionGene::new(42, 3, 9, 2.0);
    /// gene.set_enabled(false);
    ///
    /// assert!(!gene.enabled());
    /// ```
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the gene's weight is protected from mutation.
    pub fn frozen(&self) -> bool {
        self.frozen
    }

    /// Sets whether the gene's weight is protected from mutation.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}

impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}{}",
            if self.enabled { "" } else { "(" },
            self.innovation,
            self.input,
            self.output,
            self.weight,
            if self.enabled { "" } else { ")" },
            if self.frozen { "*" } else { "" },
        )
    }
}
