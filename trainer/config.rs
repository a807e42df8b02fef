use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use braincell::train::RateSchedule;
use braincell::{Activation, LayerSpec, NetworkSpec};

/// Everything the image trainer needs for one run. Every field has a
/// default, so `{}` is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: NetworkSpec,
    /// Image to learn.
    pub image: String,
    /// The image is downsampled to this many pixels per side for training.
    pub train_resolution: u32,
    pub epochs: usize,
    /// Seed for initialization and shuffling; drawn from entropy if absent.
    pub seed: Option<u64>,
    pub rate: RateSchedule,
    pub log_every: usize,
    /// Render `progress.png` every this many epochs; 0 disables.
    pub progress_every: usize,
    pub progress_size: u32,
    /// Render `result.png` every this many epochs; 0 disables.
    pub snapshot_every: usize,
    pub snapshot_size: u32,
    /// Side of the `progress.png` written after training.
    pub final_size: u32,
    pub output_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkSpec::new(vec![
                LayerSpec::new(2, Activation::RescaledTanh),
                LayerSpec::new(8, Activation::LeakyReLU),
                LayerSpec::new(3, Activation::RescaledTanh),
            ]),
            image: "./datasets/3.png".to_string(),
            train_resolution: 32,
            epochs: 50_000,
            seed: None,
            rate: RateSchedule::default(),
            log_every: 100,
            progress_every: 10,
            progress_size: 32,
            snapshot_every: 1000,
            snapshot_size: 128,
            final_size: 1024,
            output_dir: ".".to_string(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<RunConfig> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open config {}", path.display()))?;
        let config: RunConfig = serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// The network must map 2 coordinates to 3 color channels.
    pub fn validate(&self) -> Result<()> {
        let layers = &self.network.layers;
        let input = layers.first().map(|l| l.neurons);
        let output = layers.last().map(|l| l.neurons);
        if input != Some(2) || output != Some(3) {
            anyhow::bail!(
                "image trainer needs 2 input and 3 output neurons, got {:?} -> {:?}",
                input,
                output
            );
        }
        if self.train_resolution == 0 {
            anyhow::bail!("train_resolution must be at least 1");
        }
        Ok(())
    }
}
