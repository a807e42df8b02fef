use rand::Rng;

use crate::error::Result;
use crate::network::Network;
use crate::train::dataset::Dataset;

/// One epoch: shuffle the samples, take one backprop step at `rate` over the
/// whole set, then return the cost after the step.
pub fn train_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    data: &mut Dataset,
    rate: f64,
    rng: &mut R,
) -> Result<f64> {
    data.shuffle(rng)?;
    network.backprop(&data.inputs, &data.targets, rate)?;
    network.cost(&data.inputs, &data.targets)
}
