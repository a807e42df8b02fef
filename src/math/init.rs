use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Value generator for freshly allocated weights and biases.
///
/// Always sampled from an RNG the caller owns, so a fixed seed reproduces
/// the same network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Initializer {
    Zero,
    Constant { value: f64 },
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// N(0, sqrt(1 / fan_in)). Suits Sigmoid and tanh layers.
    Xavier,
    /// N(0, sqrt(2 / fan_in)). Suits LeakyReLU layers.
    He,
}

impl Initializer {
    /// Default weight initializer: uniform on [-1, 1).
    pub fn default_weights() -> Initializer {
        Initializer::Uniform { low: -1.0, high: 1.0 }
    }

    /// Default bias initializer: uniform on [-0.2, 0.2).
    pub fn default_biases() -> Initializer {
        Initializer::Uniform { low: -0.2, high: 0.2 }
    }

    /// Draws one value. `fan_in` is the number of inputs feeding the neuron
    /// and only matters for `Xavier` and `He`.
    pub fn sample<R: Rng + ?Sized>(&self, fan_in: usize, rng: &mut R) -> f64 {
        match *self {
            Initializer::Zero => 0.0,
            Initializer::Constant { value } => value,
            Initializer::Uniform { low, high } => low + (high - low) * rng.gen::<f64>(),
            Initializer::Xavier => sample_standard_normal(rng) * (1.0 / fan_in.max(1) as f64).sqrt(),
            Initializer::He => sample_standard_normal(rng) * (2.0 / fan_in.max(1) as f64).sqrt(),
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // (0, 1] keeps ln() finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
