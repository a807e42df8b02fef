use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::Result;
use crate::math::Initializer;
use crate::network::network::Network;

/// One layer of a network description.
///
/// - `neurons`    — number of neurons in this layer
/// - `activation` — nonlinearity applied to this layer's weighted sum; ignored
///                  for the input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub neurons: usize,
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(neurons: usize, activation: Activation) -> LayerSpec {
        LayerSpec { neurons, activation }
    }
}

/// A serializable network architecture plus the initializers used to fill
/// it. Carries no trained weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default = "default_name")]
    pub name: String,
    /// Ordered list of layers, input first.
    pub layers: Vec<LayerSpec>,
    #[serde(default = "Initializer::default_weights")]
    pub weight_init: Initializer,
    #[serde(default = "Initializer::default_biases")]
    pub bias_init: Initializer,
}

fn default_name() -> String {
    "network".to_string()
}

impl NetworkSpec {
    pub fn new(layers: Vec<LayerSpec>) -> NetworkSpec {
        NetworkSpec {
            name: default_name(),
            layers,
            weight_init: Initializer::default_weights(),
            bias_init: Initializer::default_biases(),
        }
    }

    /// Allocates a network of this shape, drawing every weight and bias from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::seeded(&self.layers, &self.bias_init, &self.weight_init, rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parses_minimal_json() {
        let spec: NetworkSpec = serde_json::from_str(
            r#"{"layers":[{"neurons":2,"activation":"tanh"},{"neurons":8,"activation":"relu"},{"neurons":3,"activation":"tanh"}]}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "network");
        assert_eq!(spec.layers[1], LayerSpec::new(8, Activation::LeakyReLU));
        assert_eq!(spec.weight_init, Initializer::default_weights());

        let net = spec.build(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(net.layout, vec![2, 8, 3]);
    }

    #[test]
    fn unknown_activation_is_rejected() {
        let res = serde_json::from_str::<NetworkSpec>(
            r#"{"layers":[{"neurons":2,"activation":"softsign"}]}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join("braincell_spec_test.json");
        let path = path.to_str().unwrap();
        let spec = NetworkSpec::new(vec![
            LayerSpec::new(2, Activation::Sigmoid),
            LayerSpec::new(1, Activation::Gelu),
        ]);
        spec.save_json(path).unwrap();
        let loaded = NetworkSpec::load_json(path).unwrap();
        assert_eq!(loaded.layers, spec.layers);
        let _ = std::fs::remove_file(path);
    }
}
