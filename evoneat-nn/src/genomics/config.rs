use crate::genomics::attributes::FloatAttribute;
use crate::genomics::{ActivationType, AggregationType};

use evoneat::{check_bounds, check_non_negative, check_probability, ConfigError};
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// How the connections of freshly created genomes are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConnectionScheme {
    /// No connections.
    Unconnected,
    /// Every input connects to every hidden node, and every hidden
    /// node to every output. Without hidden nodes, every input
    /// connects to every output.
    Full,
    /// As [`Full`], plus a direct connection from every input
    /// to every output.
    ///
    /// [`Full`]: ConnectionScheme::Full
    FullDirect,
    /// Each connection of [`FullDirect`] is present
    /// with the given probability.
    ///
    /// [`FullDirect`]: ConnectionScheme::FullDirect
    Partial(f32),
}

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// All quantities expressing probabilities must be in
/// the range [0.0, 1.0], and every `min`/`max` pair must
/// be ordered; this is checked by [`validate`] when a
/// population is created.
///
/// [`validate`]: GeneticConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub inputs: NonZeroUsize,
    /// Number of outputs in a genome.
    pub outputs: NonZeroUsize,
    /// Number of hidden nodes in freshly created genomes.
    pub hidden_nodes: usize,
    /// Whether genomes must stay acyclic.
    pub feed_forward: bool,
    /// Connection layout of freshly created genomes.
    pub connection_scheme: ConnectionScheme,
    /// If set, at most one structural mutation is applied per
    /// mutation, chosen by roulette over the structural chances,
    /// and deletions may disconnect outputs from inputs.
    pub alternative_structural_mutations: bool,

    /// Activation function of new nodes, one of
    /// [`activator_options`](GeneticConfig::activator_options).
    pub activator_default: ActivationType,
    /// Activation functions a node may mutate to.
    pub activator_options: Vec<ActivationType>,
    /// Chance that a node's activation function is replaced
    /// during a node mutation pass.
    pub activator_mutation_chance: f32,
    /// Aggregation function of new nodes, one of
    /// [`aggregator_options`](GeneticConfig::aggregator_options).
    pub aggregator_default: AggregationType,
    /// Aggregation functions a node may mutate to.
    pub aggregator_options: Vec<AggregationType>,
    /// Chance that a node's aggregation function is replaced
    /// during a node mutation pass.
    pub aggregator_mutation_chance: f32,

    /// Chance that connection attributes (weight, enabled and
    /// frozen flags) go through a mutation pass.
    pub link_mutation_chance: f32,
    /// Chance of a connection addition mutation.
    pub link_addition_chance: f32,
    /// Chance of a connection deletion mutation.
    pub link_deletion_chance: f32,
    /// Chance of flipping a random connection's enabled flag.
    pub link_toggle_chance: f32,
    /// Enabled flag of initial connections.
    pub enabled_default: bool,
    /// Chance, per connection, of flipping its enabled flag
    /// during a connection mutation pass.
    pub enabled_mutation_chance: f32,
    /// Frozen flag of new connections.
    pub frozen_default: bool,
    /// Chance, per connection, of flipping its frozen flag
    /// during a connection mutation pass.
    pub frozen_mutation_chance: f32,
    /// Chance that node attributes (bias, response, activation
    /// and aggregation) go through a mutation pass.
    pub node_mutation_chance: f32,
    /// Chance of a node addition mutation.
    pub node_addition_chance: f32,
    /// Chance of a hidden node deletion mutation.
    pub node_deletion_chance: f32,

    pub bias_init_mean: f32,
    pub bias_init_stdev: f32,
    pub bias_min_value: f32,
    pub bias_max_value: f32,
    pub bias_mutation_chance: f32,
    pub bias_replace_chance: f32,
    pub bias_mutation_power: f32,

    pub response_init_mean: f32,
    pub response_init_stdev: f32,
    pub response_min_value: f32,
    pub response_max_value: f32,
    pub response_mutation_chance: f32,
    pub response_replace_chance: f32,
    pub response_mutation_power: f32,

    pub weight_init_mean: f32,
    pub weight_init_stdev: f32,
    pub weight_min_value: f32,
    pub weight_max_value: f32,
    pub weight_mutation_chance: f32,
    pub weight_replace_chance: f32,
    pub weight_mutation_power: f32,
    /// Chance that a weight perturbation uses
    /// twice the mutation power.
    pub weight_severe_mutation_chance: f32,

    /// Chance that a connection disabled in either parent
    /// is enabled in the child during crossover.
    pub reenable_chance: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration:
    /// single-input, single-output, unconnected feed-forward
    /// genomes of sigmoid/sum nodes, with every chance at 0,
    /// responses fixed at 1, and everything else 0.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation. It is, however, valid.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    /// assert!(cfg1.validate().is_ok());
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     link_addition_chance: 0.5,
    ///     node_addition_chance: 0.2,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub fn zero() -> GeneticConfig {
        GeneticConfig {
            inputs: ONE,
            outputs: ONE,
            hidden_nodes: 0,
            feed_forward: true,
            connection_scheme: ConnectionScheme::Unconnected,
            alternative_structural_mutations: false,
            activator_default: ActivationType::Sigmoid,
            activator_options: vec![ActivationType::Sigmoid],
            activator_mutation_chance: 0.0,
            aggregator_default: AggregationType::Sum,
            aggregator_options: vec![AggregationType::Sum],
            aggregator_mutation_chance: 0.0,
            link_mutation_chance: 0.0,
            link_addition_chance: 0.0,
            link_deletion_chance: 0.0,
            link_toggle_chance: 0.0,
            enabled_default: true,
            enabled_mutation_chance: 0.0,
            frozen_default: false,
            frozen_mutation_chance: 0.0,
            node_mutation_chance: 0.0,
            node_addition_chance: 0.0,
            node_deletion_chance: 0.0,
            bias_init_mean: 0.0,
            bias_init_stdev: 0.0,
            bias_min_value: 0.0,
            bias_max_value: 0.0,
            bias_mutation_chance: 0.0,
            bias_replace_chance: 0.0,
            bias_mutation_power: 0.0,
            response_init_mean: 1.0,
            response_init_stdev: 0.0,
            response_min_value: 1.0,
            response_max_value: 1.0,
            response_mutation_chance: 0.0,
            response_replace_chance: 0.0,
            response_mutation_power: 0.0,
            weight_init_mean: 0.0,
            weight_init_stdev: 0.0,
            weight_min_value: 0.0,
            weight_max_value: 0.0,
            weight_mutation_chance: 0.0,
            weight_replace_chance: 0.0,
            weight_mutation_power: 0.0,
            weight_severe_mutation_chance: 0.0,
            reenable_chance: 0.0,
        }
    }

    /// Checks that every value is in its valid range.
    ///
    /// # Errors
    /// Returns the first invalid value found.
    ///
    /// # Examples
    /// ```
    /// use evoneat::ConfigError;
    /// use evoneat_nn::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     weight_min_value: 1.0,
    ///     weight_max_value: -1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(matches!(config.validate(), Err(ConfigError::InvertedBounds { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.activator_options.is_empty() {
            return Err(ConfigError::EmptyOptions {
                name: "activator_options",
            });
        }
        if self.aggregator_options.is_empty() {
            return Err(ConfigError::EmptyOptions {
                name: "aggregator_options",
            });
        }
        if !self.activator_options.contains(&self.activator_default) {
            return Err(ConfigError::DefaultNotAnOption {
                name: "activator_default",
            });
        }
        if !self.aggregator_options.contains(&self.aggregator_default) {
            return Err(ConfigError::DefaultNotAnOption {
                name: "aggregator_default",
            });
        }
        if let ConnectionScheme::Partial(probability) = self.connection_scheme {
            check_probability("connection_scheme", probability)?;
        }

        for (name, chance) in [
            ("activator_mutation_chance", self.activator_mutation_chance),
            ("aggregator_mutation_chance", self.aggregator_mutation_chance),
            ("link_mutation_chance", self.link_mutation_chance),
            ("link_addition_chance", self.link_addition_chance),
            ("link_deletion_chance", self.link_deletion_chance),
            ("link_toggle_chance", self.link_toggle_chance),
            ("enabled_mutation_chance", self.enabled_mutation_chance),
            ("frozen_mutation_chance", self.frozen_mutation_chance),
            ("node_mutation_chance", self.node_mutation_chance),
            ("node_addition_chance", self.node_addition_chance),
            ("node_deletion_chance", self.node_deletion_chance),
            ("bias_mutation_chance", self.bias_mutation_chance),
            ("bias_replace_chance", self.bias_replace_chance),
            ("response_mutation_chance", self.response_mutation_chance),
            ("response_replace_chance", self.response_replace_chance),
            ("weight_mutation_chance", self.weight_mutation_chance),
            ("weight_replace_chance", self.weight_replace_chance),
            ("weight_severe_mutation_chance", self.weight_severe_mutation_chance),
            ("reenable_chance", self.reenable_chance),
        ] {
            check_probability(name, chance)?;
        }

        check_bounds("bias", self.bias_min_value, self.bias_max_value)?;
        check_bounds("response", self.response_min_value, self.response_max_value)?;
        check_bounds("weight", self.weight_min_value, self.weight_max_value)?;

        for (name, value) in [
            ("bias_init_stdev", self.bias_init_stdev),
            ("bias_mutation_power", self.bias_mutation_power),
            ("response_init_stdev", self.response_init_stdev),
            ("response_mutation_power", self.response_mutation_power),
            ("weight_init_stdev", self.weight_init_stdev),
            ("weight_mutation_power", self.weight_mutation_power),
        ] {
            check_non_negative(name, value)?;
        }

        for (name, mean) in [
            ("bias_init_mean", self.bias_init_mean),
            ("response_init_mean", self.response_init_mean),
            ("weight_init_mean", self.weight_init_mean),
        ] {
            if !mean.is_finite() {
                return Err(ConfigError::NotANumber { name });
            }
        }

        Ok(())
    }

    pub(crate) fn bias(&self) -> FloatAttribute {
        FloatAttribute {
            init_mean: self.bias_init_mean,
            init_stdev: self.bias_init_stdev,
            min: self.bias_min_value,
            max: self.bias_max_value,
            mutation_chance: self.bias_mutation_chance,
            replace_chance: self.bias_replace_chance,
            mutation_power: self.bias_mutation_power,
            severe_chance: 0.0,
        }
    }

    pub(crate) fn response(&self) -> FloatAttribute {
        FloatAttribute {
            init_mean: self.response_init_mean,
            init_stdev: self.response_init_stdev,
            min: self.response_min_value,
            max: self.response_max_value,
            mutation_chance: self.response_mutation_chance,
            replace_chance: self.response_replace_chance,
            mutation_power: self.response_mutation_power,
            severe_chance: 0.0,
        }
    }

    pub(crate) fn weight(&self) -> FloatAttribute {
        FloatAttribute {
            init_mean: self.weight_init_mean,
            init_stdev: self.weight_init_stdev,
            min: self.weight_min_value,
            max: self.weight_max_value,
            mutation_chance: self.weight_mutation_chance,
            replace_chance: self.weight_replace_chance,
            mutation_power: self.weight_mutation_power,
            severe_chance: self.weight_severe_mutation_chance,
        }
    }
}

// SAFETY: 1 is a valid NonZeroUsize. Replace this with
// NonZeroUsize::new(1).unwrap() once const Option::unwrap
// becomes stable.
const ONE: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(1) };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert_eq!(GeneticConfig::zero().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_chance() {
        let config = GeneticConfig {
            link_toggle_chance: 1.5,
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "link_toggle_chance",
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_empty_options() {
        let config = GeneticConfig {
            aggregator_options: vec![],
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyOptions {
                name: "aggregator_options"
            })
        );
    }

    #[test]
    fn rejects_default_outside_options() {
        let config = GeneticConfig {
            activator_default: ActivationType::Identity,
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultNotAnOption {
                name: "activator_default"
            })
        );

        let config = GeneticConfig {
            aggregator_default: AggregationType::Max,
            ..GeneticConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultNotAnOption {
                name: "aggregator_default"
            })
        );

        let config = GeneticConfig {
            aggregator_default: AggregationType::Max,
            aggregator_options: vec![AggregationType::Sum, AggregationType::Max],
            ..GeneticConfig::zero()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_power() {
        let config = GeneticConfig {
            bias_mutation_power: -0.1,
            ..GeneticConfig::zero()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                name: "bias_mutation_power",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_partial_scheme() {
        let config = GeneticConfig {
            connection_scheme: ConnectionScheme::Partial(-0.5),
            ..GeneticConfig::zero()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn attributes_follow_config() {
        let config = GeneticConfig {
            weight_min_value: -3.0,
            weight_max_value: 3.0,
            weight_severe_mutation_chance: 0.1,
            ..GeneticConfig::zero()
        };
        let weight = config.weight();
        assert_eq!((weight.min, weight.max), (-3.0, 3.0));
        assert_eq!(weight.severe_chance, 0.1);
        assert_eq!(config.bias().severe_chance, 0.0);
        assert_eq!(config.response().default_value(), 1.0);
    }
}
