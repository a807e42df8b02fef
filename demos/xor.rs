use braincell::train::{ConstantRate, TrainConfig};
use braincell::{train_loop, Activation, Dataset, Initializer, LayerSpec, Matrix, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> braincell::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("BRAINCELL_LOG", "info")).init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::seeded(
        &[
            LayerSpec::new(2, Activation::Sigmoid),
            LayerSpec::new(2, Activation::Sigmoid),
            LayerSpec::new(1, Activation::Sigmoid),
        ],
        &Initializer::default_biases(),
        &Initializer::default_weights(),
        &mut rng,
    )?;

    let mut data = Dataset::xor();

    // Cross-check the analytic gradient before training.
    let analytic = network.backprop_gradient(&data.inputs, &data.targets)?;
    let numeric = network.finite_diff_gradient(&data.inputs, &data.targets, 1e-6)?;
    let n = data.len() as f64;
    let worst = analytic.weights.iter().zip(&numeric.weights)
        .chain(analytic.biases.iter().zip(&numeric.biases))
        .flat_map(|(a, b)| a.data.iter().flatten().zip(b.data.iter().flatten()))
        .map(|(a, b)| (a * n - b).abs())
        .fold(0.0, f64::max);
    println!("max |backprop - finite diff| = {worst:.2e}");

    let config = TrainConfig::new(10_000).with_log_every(1000);
    let cost = train_loop(&mut network, &mut data, &mut ConstantRate(1.0), &config, &mut rng, |_, _| {})?;
    println!("final cost: {cost:.6}");

    print!("{network}");
    for input in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
        let out = network.predict(&Matrix::row_vector(input.to_vec()))?;
        println!("Input: {:?} -> Output: {:.4}", input, out.data[0][0]);
    }
    Ok(())
}
