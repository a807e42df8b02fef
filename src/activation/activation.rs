use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;
use std::f64::consts::{E, SQRT_2};
use std::fmt;
use std::str::FromStr;

use crate::error::NetError;

/// Slope of the negative half of LeakyReLU, also the derivative floor used
/// by LeakyReLU and GELU.
pub const LEAKY_SLOPE: f64 = 0.01;

/// Per-layer nonlinearity.
///
/// `derivative` takes the *post-activation* value `a = function(x)`, not the
/// pre-activation sum. That is exact for Sigmoid and LeakyReLU; for GELU it is
/// the LeakyReLU slope, and for RescaledTanh it is `1 - a²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Activation {
    Sigmoid,
    LeakyReLU,
    Gelu,
    /// tanh shifted and scaled into (0, 1).
    RescaledTanh,
}

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            Activation::LeakyReLU => if x > 0.0 { x } else { x * LEAKY_SLOPE },
            Activation::Gelu => 0.5 * x * (1.0 + erf(x / SQRT_2)),
            Activation::RescaledTanh => (x.tanh() + 1.0) / 2.0,
        }
    }

    /// Derivative evaluated on the activation output `a`.
    pub fn derivative(&self, a: f64) -> f64 {
        match self {
            Activation::Sigmoid => a * (1.0 - a),
            Activation::LeakyReLU | Activation::Gelu => if a >= 0.0 { 1.0 } else { LEAKY_SLOPE },
            Activation::RescaledTanh => 1.0 - a * a,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::LeakyReLU => "leaky_relu",
            Activation::Gelu => "gelu",
            Activation::RescaledTanh => "rescaled_tanh",
        }
    }
}

impl FromStr for Activation {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(Activation::Sigmoid),
            "leaky_relu" | "leakyrelu" | "relu" => Ok(Activation::LeakyReLU),
            "gelu" => Ok(Activation::Gelu),
            "rescaled_tanh" | "tanh" => Ok(Activation::RescaledTanh),
            other => Err(NetError::Configuration(format!("unknown activation function '{other}'"))),
        }
    }
}

impl TryFrom<String> for Activation {
    type Error = NetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Activation> for String {
    fn from(act: Activation) -> String {
        act.name().to_string()
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
