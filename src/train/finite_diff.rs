use crate::error::{NetError, Result};
use crate::math::Matrix;
use crate::network::Network;
use crate::train::cost::check_rows;

#[derive(Clone, Copy)]
enum Slot {
    Weights,
    Biases,
}

fn slot(network: &mut Network, slot: Slot, layer: usize) -> &mut Matrix {
    match slot {
        Slot::Weights => &mut network.weights[layer],
        Slot::Biases => &mut network.biases[layer],
    }
}

impl Network {
    /// Forward-difference estimate of the cost gradient.
    ///
    /// Each weight and bias is nudged by `eps` in turn, the total cost is
    /// recomputed and `(perturbed - base) / eps` recorded, then the entry is
    /// restored. Runs one full cost evaluation per parameter.
    ///
    /// The estimate is of the unaveraged `cost`, so for a single-output
    /// network it equals `backprop_gradient` times the sample count.
    pub fn finite_diff_gradient(&mut self, inputs: &Matrix, targets: &Matrix, eps: f64) -> Result<Network> {
        check_rows(inputs, targets)?;
        if !eps.is_finite() || eps == 0.0 {
            return Err(NetError::Configuration(format!("finite difference step must be non-zero, got {eps}")));
        }

        let base = self.cost(inputs, targets)?;
        let mut gradient = self.zeroed_like();

        for layer in 0..self.layer_count - 1 {
            for which in [Slot::Weights, Slot::Biases] {
                let (rows, cols) = slot(self, which, layer).shape();
                for i in 0..rows {
                    for j in 0..cols {
                        let saved = slot(self, which, layer).data[i][j];
                        slot(self, which, layer).data[i][j] = saved + eps;
                        let perturbed = self.cost(inputs, targets);
                        slot(self, which, layer).data[i][j] = saved;

                        slot(&mut gradient, which, layer).data[i][j] = (perturbed? - base) / eps;
                    }
                }
            }
        }

        Ok(gradient)
    }

    /// One gradient-descent step using the finite-difference estimate.
    pub fn finite_diff(&mut self, inputs: &Matrix, targets: &Matrix, eps: f64, rate: f64) -> Result<()> {
        let gradient = self.finite_diff_gradient(inputs, targets, eps)?;
        self.adjust(&gradient, rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::network::LayerSpec;

    #[test]
    fn linear_neuron_derivative() {
        // out = w*x + b (LeakyReLU on a positive sum), cost = (t - out)^2.
        let specs = [LayerSpec::new(1, Activation::LeakyReLU), LayerSpec::new(1, Activation::LeakyReLU)];
        let mut net = Network::new(&specs, || 1.0, || 2.0).unwrap();
        let inputs = Matrix::from_data(vec![vec![3.0]]).unwrap();
        let targets = Matrix::from_data(vec![vec![10.0]]).unwrap();

        // d/dw = -2 (t - out) x = -2 * 3 * 3, d/db = -2 (t - out) = -6
        let grad = net.finite_diff_gradient(&inputs, &targets, 1e-6).unwrap();
        assert!((grad.weights[0].data[0][0] + 18.0).abs() < 1e-3);
        assert!((grad.biases[0].data[0][0] + 6.0).abs() < 1e-3);

        // Parameters are restored.
        assert_eq!(net.weights[0].data[0][0], 2.0);
        assert_eq!(net.biases[0].data[0][0], 1.0);
    }

    #[test]
    fn step_moves_towards_target() {
        let specs = [LayerSpec::new(1, Activation::LeakyReLU), LayerSpec::new(1, Activation::LeakyReLU)];
        let mut net = Network::new(&specs, || 1.0, || 2.0).unwrap();
        let inputs = Matrix::from_data(vec![vec![3.0]]).unwrap();
        let targets = Matrix::from_data(vec![vec![10.0]]).unwrap();
        let before = net.cost(&inputs, &targets).unwrap();
        net.finite_diff(&inputs, &targets, 1e-6, 0.01).unwrap();
        assert!(net.cost(&inputs, &targets).unwrap() < before);
    }

    #[test]
    fn row_mismatch_is_rejected() {
        let specs = [LayerSpec::new(2, Activation::Sigmoid), LayerSpec::new(1, Activation::Sigmoid)];
        let mut net = Network::new(&specs, || 0.1, || 0.3).unwrap();
        let before = net.clone();
        let res = net.finite_diff(&Matrix::zeros(3, 2), &Matrix::zeros(2, 1), 1e-6, 0.1);
        assert!(matches!(res, Err(NetError::RowMismatch { inputs: 3, targets: 2 })));
        assert_eq!(net, before);
    }

    #[test]
    fn empty_set_gives_zero_gradient() {
        let specs = [
            LayerSpec::new(2, Activation::Sigmoid),
            LayerSpec::new(3, Activation::Sigmoid),
            LayerSpec::new(1, Activation::Sigmoid),
        ];
        let mut net = Network::new(&specs, || 0.1, || 0.3).unwrap();
        let before = net.clone();
        let (inputs, targets) = (Matrix::zeros(0, 2), Matrix::zeros(0, 1));

        let grad = net.finite_diff_gradient(&inputs, &targets, 1e-6).unwrap();
        assert_eq!(grad, net.zeroed_like());

        net.finite_diff(&inputs, &targets, 1e-6, 0.5).unwrap();
        assert_eq!(net, before);
    }

    #[test]
    fn rejects_zero_step() {
        let specs = [LayerSpec::new(1, Activation::Sigmoid), LayerSpec::new(1, Activation::Sigmoid)];
        let mut net = Network::new(&specs, || 0.0, || 0.0).unwrap();
        let res = net.finite_diff(&Matrix::zeros(1, 1), &Matrix::zeros(1, 1), 0.0, 0.1);
        assert!(matches!(res, Err(NetError::Configuration(_))));
    }
}
