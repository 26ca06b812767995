use rand::Rng;

/// Bernoulli trials with `f32` probabilities, for any
/// random number generator.
///
/// Configured chances are stored as `f32`, which
/// `Rng::gen_bool` does not take.
///
/// # Examples
/// ```
/// use evoneat::Chance;
///
/// let mut rng = rand::thread_rng();
/// assert!(!rng.chance(0.0));
/// assert!(rng.chance(1.0));
/// ```
pub trait Chance {
    /// Returns `true` with probability `probability`.
    fn chance(&mut self, probability: f32) -> bool;
}

impl<R: Rng + ?Sized> Chance for R {
    fn chance(&mut self, probability: f32) -> bool {
        self.gen::<f32>() < probability
    }
}
