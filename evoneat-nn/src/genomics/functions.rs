use serde::{Deserialize, Serialize};

/// An ActivationType represents the type
/// of activation function a node's network
/// equivalent will apply to its aggregated input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationType {
    // 1 / (1 + exp(-4.9x))
    Sigmoid,
    // tanh(x)
    Tanh,
    // sin(x)
    Sin,
    // exp(-x²)
    Gauss,
    // max(0, x)
    ReLU,
    // x        if x > 0
    // eˣ - 1   otherwise
    ELU,
    // ln(1 + eˣ)
    Softplus,
    // x
    Identity,
    // x clamped to [-1, 1]
    Clamped,
    // 1 / x, or 0 at x = 0
    Inv,
    // ln(x), with x floored at 1e-7
    Log,
    // eˣ, with x clamped to [-60, 60]
    Exp,
    // |x|
    Abs,
    // max(0, 1 - |x|)
    Hat,
    // x²
    Square,
    // x³
    Cube,
}

impl ActivationType {
    /// Every available activation function.
    pub const ALL: [ActivationType; 16] = [
        ActivationType::Sigmoid,
        ActivationType::Tanh,
        ActivationType::Sin,
        ActivationType::Gauss,
        ActivationType::ReLU,
        ActivationType::ELU,
        ActivationType::Softplus,
        ActivationType::Identity,
        ActivationType::Clamped,
        ActivationType::Inv,
        ActivationType::Log,
        ActivationType::Exp,
        ActivationType::Abs,
        ActivationType::Hat,
        ActivationType::Square,
        ActivationType::Cube,
    ];

    /// Applies the activation function to `x`.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Sigmoid.activate(0.0), 0.5);
    /// assert_eq!(ActivationType::ReLU.activate(-3.0), 0.0);
    /// assert_eq!(ActivationType::Hat.activate(0.25), 0.75);
    /// assert_eq!(ActivationType::Inv.activate(0.0), 0.0);
    /// ```
    pub fn activate(self, x: f32) -> f32 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-4.9 * x).exp()),
            ActivationType::Tanh => x.tanh(),
            ActivationType::Sin => x.sin(),
            ActivationType::Gauss => (-x * x).exp(),
            ActivationType::ReLU => x.max(0.0),
            ActivationType::ELU => {
                if x > 0.0 {
                    x
                } else {
                    x.exp() - 1.0
                }
            }
            ActivationType::Softplus => x.exp().ln_1p(),
            ActivationType::Identity => x,
            ActivationType::Clamped => x.clamp(-1.0, 1.0),
            ActivationType::Inv => {
                if x == 0.0 {
                    0.0
                } else {
                    x.recip()
                }
            }
            ActivationType::Log => x.max(1e-7).ln(),
            ActivationType::Exp => x.clamp(-60.0, 60.0).exp(),
            ActivationType::Abs => x.abs(),
            ActivationType::Hat => (1.0 - x.abs()).max(0.0),
            ActivationType::Square => x * x,
            ActivationType::Cube => x * x * x,
        }
    }
}

/// An AggregationType represents the function used
/// to reduce a node's weighted inputs to a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Product,
    Max,
    Min,
    /// The input with the greatest magnitude, sign included.
    MaxAbs,
    Median,
    Mean,
}

impl AggregationType {
    /// Every available aggregation function.
    pub const ALL: [AggregationType; 7] = [
        AggregationType::Sum,
        AggregationType::Product,
        AggregationType::Max,
        AggregationType::Min,
        AggregationType::MaxAbs,
        AggregationType::Median,
        AggregationType::Mean,
    ];

    /// Reduces `inputs` to a single value.
    ///
    /// A node without inputs aggregates to 0, except
    /// for [`Product`], which yields 1.
    ///
    /// [`Product`]: AggregationType::Product
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::AggregationType;
    ///
    /// let inputs = [1.0, -4.0, 2.0];
    /// assert_eq!(AggregationType::Sum.aggregate(&inputs), -1.0);
    /// assert_eq!(AggregationType::MaxAbs.aggregate(&inputs), -4.0);
    /// assert_eq!(AggregationType::Median.aggregate(&inputs), 1.0);
    /// assert_eq!(AggregationType::Product.aggregate(&[]), 1.0);
    /// ```
    pub fn aggregate(self, inputs: &[f32]) -> f32 {
        if inputs.is_empty() {
            return match self {
                AggregationType::Product => 1.0,
                _ => 0.0,
            };
        }
        match self {
            AggregationType::Sum => inputs.iter().sum(),
            AggregationType::Product => inputs.iter().product(),
            AggregationType::Max => inputs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            AggregationType::Min => inputs.iter().copied().fold(f32::INFINITY, f32::min),
            AggregationType::MaxAbs => inputs
                .iter()
                .copied()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap_or(0.0),
            AggregationType::Median => {
                let mut sorted = inputs.to_vec();
                sorted.sort_by(f32::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            AggregationType::Mean => inputs.iter().sum::<f32>() / inputs.len() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steepened_sigmoid() {
        let sigmoid = ActivationType::Sigmoid;
        assert!(sigmoid.activate(1.0) > 0.99);
        assert!(sigmoid.activate(-1.0) < 0.01);
        assert!((sigmoid.activate(0.1) - 1.0 / (1.0 + (-0.49f32).exp())).abs() < 1e-6);
    }

    #[test]
    fn activations_are_finite() {
        for activation in ActivationType::ALL {
            for x in [-100.0, -1.0, -1e-9, 0.0, 1e-9, 0.5, 1.0, 100.0] {
                let y = activation.activate(x);
                assert!(!y.is_nan(), "{:?}({}) is NaN", activation, x);
            }
        }
    }

    #[test]
    fn piecewise_activations() {
        assert_eq!(ActivationType::ELU.activate(2.0), 2.0);
        assert!((ActivationType::ELU.activate(-1.0) - ((-1.0f32).exp() - 1.0)).abs() < 1e-6);
        assert_eq!(ActivationType::Clamped.activate(3.0), 1.0);
        assert_eq!(ActivationType::Clamped.activate(-3.0), -1.0);
        assert_eq!(ActivationType::Clamped.activate(0.3), 0.3);
        assert_eq!(ActivationType::Log.activate(-5.0), 1e-7f32.ln());
        assert_eq!(ActivationType::Exp.activate(1000.0), 60.0f32.exp());
        assert_eq!(ActivationType::Cube.activate(-2.0), -8.0);
    }

    #[test]
    fn aggregations() {
        let inputs = [3.0, -1.0, 2.0, -5.0];
        assert_eq!(AggregationType::Sum.aggregate(&inputs), -1.0);
        assert_eq!(AggregationType::Product.aggregate(&inputs), 30.0);
        assert_eq!(AggregationType::Max.aggregate(&inputs), 3.0);
        assert_eq!(AggregationType::Min.aggregate(&inputs), -5.0);
        assert_eq!(AggregationType::MaxAbs.aggregate(&inputs), -5.0);
        assert_eq!(AggregationType::Median.aggregate(&inputs), 0.5);
        assert_eq!(AggregationType::Mean.aggregate(&inputs), -0.25);
    }

    #[test]
    fn empty_aggregations() {
        for aggregation in AggregationType::ALL {
            let expected = if aggregation == AggregationType::Product {
                1.0
            } else {
                0.0
            };
            assert_eq!(aggregation.aggregate(&[]), expected, "{:?}", aggregation);
        }
    }
}
