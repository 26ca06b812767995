use evoneat::Chance;

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Initialization and mutation parameters of a bounded
/// real-valued gene attribute (bias, response or weight).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FloatAttribute {
    pub(crate) init_mean: f32,
    pub(crate) init_stdev: f32,
    pub(crate) min: f32,
    pub(crate) max: f32,
    pub(crate) mutation_chance: f32,
    pub(crate) replace_chance: f32,
    pub(crate) mutation_power: f32,
    /// Chance that a perturbation uses twice the mutation power.
    pub(crate) severe_chance: f32,
}

impl FloatAttribute {
    /// Draws a value from the initial distribution,
    /// clamped into bounds.
    pub(crate) fn initial<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.clamp(gaussian(self.init_mean, self.init_stdev, rng))
    }

    /// The initial distribution's mean, clamped into bounds.
    pub(crate) fn default_value(&self) -> f32 {
        self.clamp(self.init_mean)
    }

    /// With `mutation_chance`, either replaces `value` with a
    /// fresh initial value or perturbs it with gaussian noise.
    /// The result is always within bounds.
    pub(crate) fn mutated<R: Rng + ?Sized>(&self, value: f32, rng: &mut R) -> f32 {
        if !rng.chance(self.mutation_chance) {
            return value;
        }
        if rng.chance(self.replace_chance) {
            return self.initial(rng);
        }
        let power = if rng.chance(self.severe_chance) {
            2.0 * self.mutation_power
        } else {
            self.mutation_power
        };
        self.clamp(value + gaussian(0.0, power, rng))
    }

    pub(crate) fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

fn gaussian<R: Rng + ?Sized>(mean: f32, stdev: f32, rng: &mut R) -> f32 {
    match Normal::new(mean, stdev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn attribute() -> FloatAttribute {
        FloatAttribute {
            init_mean: 0.0,
            init_stdev: 5.0,
            min: -1.0,
            max: 2.0,
            mutation_chance: 1.0,
            replace_chance: 0.2,
            mutation_power: 3.0,
            severe_chance: 0.5,
        }
    }

    #[test]
    fn values_stay_in_bounds() {
        let attribute = attribute();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut value = attribute.initial(&mut rng);
        for _ in 0..1000 {
            assert!((-1.0..=2.0).contains(&value));
            value = attribute.mutated(value, &mut rng);
        }
    }

    #[test]
    fn no_mutation_keeps_value() {
        let attribute = FloatAttribute {
            mutation_chance: 0.0,
            ..attribute()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(attribute.mutated(1.5, &mut rng), 1.5);
    }

    #[test]
    fn zero_deviation_is_deterministic() {
        let attribute = FloatAttribute {
            init_mean: 0.5,
            init_stdev: 0.0,
            ..attribute()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(attribute.initial(&mut rng), 0.5);
        assert_eq!(attribute.default_value(), 0.5);
    }
}
