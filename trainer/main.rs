/// braincell image trainer
///
/// Learns a picture: a small network maps normalized pixel coordinates to
/// RGB and is trained by full-batch backpropagation, with the learning rate
/// shrunk whenever the cost starts oscillating.
///
/// Run with:
///   cargo run --release -- [config.json]
///
/// Without a config the defaults in `RunConfig` apply (2 → 8 → 3 network,
/// `./datasets/3.png`). Log level is read from `BRAINCELL_LOG`.

mod config;
mod raster;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use braincell::train::{train_loop, TrainConfig};

use config::RunConfig;

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BRAINCELL_LOG", "info"))
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = load_config(config_path.as_deref()).and_then(|config| run(&config)) {
        log::error!("training failed: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            log::info!("loading run config from {}", path.display());
            RunConfig::load(path)
        }
        None => {
            log::info!("no config given, using defaults");
            Ok(RunConfig::default())
        }
    }
}

fn run(config: &RunConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    log::info!("seed: {seed}");

    let mut data = raster::load_dataset(Path::new(&config.image), config.train_resolution)?;
    let mut network = config.network.build(&mut rng).context("failed to build network")?;
    log::debug!("initial network:\n{network}");

    let out_dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output dir {}", out_dir.display()))?;
    let progress_path = out_dir.join("progress.png");
    let result_path = out_dir.join("result.png");

    let mut rate_control = config.rate.build();
    let train_config = TrainConfig::new(config.epochs).with_log_every(config.log_every);

    let cost = train_loop(
        &mut network,
        &mut data,
        rate_control.as_mut(),
        &train_config,
        &mut rng,
        |net, stats| {
            let renders = [
                (config.progress_every, config.progress_size, &progress_path),
                (config.snapshot_every, config.snapshot_size, &result_path),
            ];
            for (every, size, path) in renders {
                if every > 0 && stats.epoch % every == 0 {
                    if let Err(e) = raster::render(net, size, path) {
                        log::warn!("epoch {}: {:#}", stats.epoch, e);
                    }
                }
            }
        },
    )?;

    raster::render(&network, config.final_size, &progress_path)?;
    log::info!("final cost {cost:.5}, wrote {}", progress_path.display());
    log::info!("seed: {seed}");
    Ok(())
}
