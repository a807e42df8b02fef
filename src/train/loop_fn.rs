use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::dataset::Dataset;
use crate::train::epoch_stats::EpochStats;
use crate::train::rate_control::RateControl;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_epoch;

/// Trains `network` for `config.epochs` epochs and returns the cost after
/// the **last completed epoch**.
///
/// Each epoch shuffles `data`, takes one full-batch backprop step at the rate
/// chosen by `rate_control`, evaluates the cost and reports it back to
/// `rate_control`. `on_epoch` runs after every epoch, e.g. to render
/// progress.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop<R, F>(
    network: &mut Network,
    data: &mut Dataset,
    rate_control: &mut dyn RateControl,
    config: &TrainConfig,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<f64>
where
    R: Rng + ?Sized,
    F: FnMut(&Network, &EpochStats),
{
    let mut last_cost = network.cost(&data.inputs, &data.targets)?;
    log::info!(
        "training {:?} ({} parameters) on {} samples for {} epochs, initial cost {:.4}",
        network.layout,
        network.parameter_count(),
        data.len(),
        config.epochs,
        last_cost
    );

    for epoch in 0..config.epochs {
        if stop_requested(config) {
            log::info!("stop requested before epoch {epoch}");
            break;
        }

        let t_start = Instant::now();

        let rate = rate_control.rate();
        let cost = train_epoch(network, data, rate, rng)?;
        rate_control.observe(epoch, cost);
        last_cost = cost;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            cost,
            rate,
            volatility: rate_control.volatility(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        log::debug!(
            "epoch: {:07} rate: {:.4} cost: {:.5} vol: {:.2}",
            epoch,
            rate,
            cost,
            stats.volatility.unwrap_or(0.0)
        );
        if config.log_every > 0 && epoch % config.log_every == 0 {
            log::info!("epoch {epoch}/{}: cost {cost:.5} rate {rate:.4}", config.epochs);
        }

        on_epoch(network, &stats);

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                log::info!("progress receiver dropped, stopping after epoch {epoch}");
                break;
            }
        }
    }

    Ok(last_cost)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
