use std::fmt;

use rand::Rng;

use crate::activation::Activation;
use crate::error::{NetError, Result};
use crate::math::{Initializer, Matrix};
use crate::network::spec::LayerSpec;

/// Fully-connected feed-forward network.
///
/// `weights[l]` is `layout[l] × layout[l + 1]` and `biases[l]` is
/// `1 × layout[l + 1]`. `activation_func[l]` is applied to layer `l`'s
/// weighted sum; the input layer's tag is never used.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub layer_count: usize,
    pub layout: Vec<usize>,
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    pub activation_func: Vec<Activation>,
}

/// Per-layer activation buffers for one forward pass.
///
/// Owned by the caller, so any number of threads can evaluate the same
/// read-only `Network`, each with its own `Activations`.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    pub layers: Vec<Matrix>,
}

#[derive(Clone, Copy)]
enum Param {
    Weight,
    Bias,
}

impl Network {
    /// Builds a network from an ordered list of layers.
    ///
    /// `bias_init` and `weight_init` are called once per entry, weights of a
    /// layer before its biases, layers in order.
    pub fn new<B, W>(layer_specs: &[LayerSpec], mut bias_init: B, mut weight_init: W) -> Result<Network>
    where
        B: FnMut() -> f64,
        W: FnMut() -> f64,
    {
        Network::build(layer_specs, |param, _| match param {
            Param::Weight => weight_init(),
            Param::Bias => bias_init(),
        })
    }

    /// Builds a network whose parameters are drawn from `rng`.
    pub fn seeded<R: Rng + ?Sized>(
        layer_specs: &[LayerSpec],
        bias_init: &Initializer,
        weight_init: &Initializer,
        rng: &mut R,
    ) -> Result<Network> {
        Network::build(layer_specs, |param, fan_in| match param {
            Param::Weight => weight_init.sample(fan_in, rng),
            Param::Bias => bias_init.sample(fan_in, rng),
        })
    }

    fn build<F>(layer_specs: &[LayerSpec], mut fill: F) -> Result<Network>
    where
        F: FnMut(Param, usize) -> f64,
    {
        if layer_specs.is_empty() {
            return Err(NetError::Configuration("a network needs at least one layer".into()));
        }
        if let Some(pos) = layer_specs.iter().position(|spec| spec.neurons == 0) {
            return Err(NetError::Configuration(format!("layer {pos} has no neurons")));
        }

        let layout: Vec<usize> = layer_specs.iter().map(|spec| spec.neurons).collect();
        let activation_func = layer_specs.iter().map(|spec| spec.activation).collect();

        let mut weights = Vec::with_capacity(layout.len() - 1);
        let mut biases = Vec::with_capacity(layout.len() - 1);
        for pair in layout.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            weights.push(Matrix::new(fan_in, fan_out, || fill(Param::Weight, fan_in)));
            biases.push(Matrix::new(1, fan_out, || fill(Param::Bias, fan_in)));
        }

        Ok(Network {
            layer_count: layout.len(),
            layout,
            weights,
            biases,
            activation_func,
        })
    }

    /// Same layout and activations, every weight and bias zero.
    pub fn zeroed_like(&self) -> Network {
        Network {
            layer_count: self.layer_count,
            layout: self.layout.clone(),
            weights: self.weights.iter().map(|w| Matrix::zeros(w.rows, w.cols)).collect(),
            biases: self.biases.iter().map(|b| Matrix::zeros(b.rows, b.cols)).collect(),
            activation_func: self.activation_func.clone(),
        }
    }

    /// Fresh zeroed activation buffers matching this layout.
    pub fn scratch(&self) -> Activations {
        Activations {
            layers: self.layout.iter().map(|&n| Matrix::zeros(1, n)).collect(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.layout[0]
    }

    pub fn output_size(&self) -> usize {
        self.layout[self.layer_count - 1]
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.iter().chain(self.biases.iter())
            .map(|m| m.rows * m.cols)
            .sum()
    }

    /// Forward pass of one `1 × layout[0]` sample.
    ///
    /// Overwrites every buffer in `scratch` and returns the output layer's
    /// buffer.
    pub fn forward<'a>(&self, input: &Matrix, scratch: &'a mut Activations) -> Result<&'a Matrix> {
        if input.shape() != (1, self.input_size()) {
            return Err(NetError::shape("forward", (1, self.input_size()), input.shape()));
        }
        if scratch.layers.len() != self.layer_count {
            return Err(NetError::Dimension {
                op: "forward",
                expected: format!("{} activation buffers", self.layer_count),
                got: format!("{} activation buffers", scratch.layers.len()),
            });
        }

        scratch.layers[0].clone_from(input);

        for layer in 0..self.layer_count - 1 {
            let activation = self.activation_func[layer + 1];
            let mut next = scratch.layers[layer]
                .dot(&self.weights[layer])?
                .sum(&self.biases[layer])?;
            next.apply_in_place(|x| activation.function(x));
            scratch.layers[layer + 1] = next;
        }

        Ok(scratch.output())
    }

    /// Forward pass with a private scratch; returns a copy of the output.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        let mut scratch = self.scratch();
        self.forward(input, &mut scratch).cloned()
    }

    /// `weights[l] -= rate * gradient.weights[l]`, same for biases.
    pub fn adjust(&mut self, gradient: &Network, rate: f64) -> Result<()> {
        if gradient.layout != self.layout {
            return Err(NetError::Dimension {
                op: "adjust",
                expected: format!("{:?}", self.layout),
                got: format!("{:?}", gradient.layout),
            });
        }

        let params = self.weights.iter_mut().zip(&gradient.weights)
            .chain(self.biases.iter_mut().zip(&gradient.biases));
        for (param, grad) in params {
            for (row, grad_row) in param.data.iter_mut().zip(&grad.data) {
                for (x, g) in row.iter_mut().zip(grad_row) {
                    *x -= g * rate;
                }
            }
        }
        Ok(())
    }
}

impl Activations {
    pub fn output(&self) -> &Matrix {
        // Never empty: networks have at least one layer.
        &self.layers[self.layers.len() - 1]
    }

    pub fn zero(&mut self) {
        for layer in &mut self.layers {
            layer.fill(0.0);
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in 0..self.layer_count - 1 {
            let name = self.activation_func[layer + 1];
            self.weights[layer].write_labeled(f, &format!("Weightlayer {} ({name})", layer + 1))?;
            self.biases[layer].write_labeled(f, &format!("Biaslayer {}", layer + 1))?;
        }
        Ok(())
    }
}

impl fmt::Display for Activations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.layers.len() - 1;
        for (layer, buffer) in self.layers.iter().enumerate() {
            if layer == last {
                buffer.write_labeled(f, "Output layer")?;
            } else {
                buffer.write_labeled(f, &format!("Activationlayer {}", layer + 1))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn specs(layout: &[usize], act: Activation) -> Vec<LayerSpec> {
        layout.iter().map(|&n| LayerSpec::new(n, act)).collect()
    }

    #[test]
    fn shapes_follow_layout() {
        let net = Network::new(&specs(&[3, 5, 2], Activation::Sigmoid), || 0.1, || 0.2).unwrap();
        assert_eq!(net.layer_count, 3);
        assert_eq!(net.weights.len(), 2);
        assert_eq!(net.biases.len(), 2);
        assert_eq!(net.weights[0].shape(), (3, 5));
        assert_eq!(net.weights[1].shape(), (5, 2));
        assert_eq!(net.biases[0].shape(), (1, 5));
        assert_eq!(net.biases[1].shape(), (1, 2));
        assert_eq!(net.parameter_count(), 15 + 10 + 5 + 2);

        let scratch = net.scratch();
        for (buffer, &n) in scratch.layers.iter().zip(&net.layout) {
            assert_eq!(buffer.shape(), (1, n));
        }
    }

    #[test]
    fn rejects_empty_layouts() {
        assert!(matches!(Network::new(&[], || 0.0, || 0.0), Err(NetError::Configuration(_))));
        let bad = specs(&[2, 0, 1], Activation::Sigmoid);
        assert!(matches!(Network::new(&bad, || 0.0, || 0.0), Err(NetError::Configuration(_))));
    }

    #[test]
    fn single_weight_forward() {
        // LeakyReLU is the identity on positive sums.
        let net = Network::new(&specs(&[1, 1], Activation::LeakyReLU), || 0.0, || 2.0).unwrap();
        let out = net.predict(&Matrix::row_vector(vec![3.0])).unwrap();
        assert_eq!(out.data, vec![vec![6.0]]);
    }

    #[test]
    fn single_layer_passes_input_through() {
        let net = Network::new(&specs(&[3], Activation::Sigmoid), || 0.0, || 0.0).unwrap();
        assert!(net.weights.is_empty());
        assert_eq!(net.parameter_count(), 0);
        let input = Matrix::row_vector(vec![-2.0, 0.0, 7.5]);
        assert_eq!(net.predict(&input).unwrap(), input);
    }

    #[test]
    fn forward_fills_scratch() {
        let net = Network::new(&specs(&[2, 2, 1], Activation::Sigmoid), || 0.0, || 1.0).unwrap();
        let mut scratch = net.scratch();
        let input = Matrix::row_vector(vec![0.5, -0.5]);
        let out = net.forward(&input, &mut scratch).unwrap().clone();
        assert_eq!(scratch.layers[0], input);
        // Hidden sums are 0, so hidden activations are sigmoid(0) = 0.5.
        assert_eq!(scratch.layers[1].data[0], vec![0.5, 0.5]);
        let expected = Activation::Sigmoid.function(1.0);
        assert!((out.data[0][0] - expected).abs() < 1e-12);
    }

    #[test]
    fn sigmoid_outputs_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let net = Network::seeded(
            &specs(&[3, 6, 4], Activation::Sigmoid),
            &Initializer::default_biases(),
            &Initializer::Uniform { low: -3.0, high: 3.0 },
            &mut rng,
        )
        .unwrap();
        for i in 0..20 {
            let x = (i as f64 - 10.0) / 5.0;
            let out = net.predict(&Matrix::row_vector(vec![x, -x * 2.0, 0.3 * x])).unwrap();
            assert!(out.data[0].iter().all(|&a| a > 0.0 && a < 1.0));
        }
    }

    #[test]
    fn forward_rejects_wrong_input() {
        let net = Network::new(&specs(&[2, 1], Activation::Sigmoid), || 0.0, || 0.0).unwrap();
        let res = net.predict(&Matrix::row_vector(vec![1.0, 2.0, 3.0]));
        assert!(matches!(res, Err(NetError::Dimension { op: "forward", .. })));
    }

    #[test]
    fn seeded_is_reproducible() {
        let layers = specs(&[2, 4, 1], Activation::RescaledTanh);
        let a = Network::seeded(&layers, &Initializer::He, &Initializer::Xavier, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = Network::seeded(&layers, &Initializer::He, &Initializer::Xavier, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn adjust_steps_against_gradient() {
        let mut net = Network::new(&specs(&[2, 1], Activation::Sigmoid), || 1.0, || 1.0).unwrap();
        let mut grad = net.zeroed_like();
        grad.weights[0].fill(2.0);
        grad.biases[0].fill(-1.0);
        net.adjust(&grad, 0.5).unwrap();
        assert_eq!(net.weights[0].data, vec![vec![0.0], vec![0.0]]);
        assert_eq!(net.biases[0].data, vec![vec![1.5]]);

        let other = Network::new(&specs(&[3, 1], Activation::Sigmoid), || 0.0, || 0.0).unwrap();
        assert!(net.adjust(&other, 0.1).is_err());
    }

    #[test]
    fn debug_print_lists_layers() {
        let net = Network::new(&specs(&[1, 2, 1], Activation::Gelu), || 0.0, || 1.0).unwrap();
        let printed = net.to_string();
        assert!(printed.contains("Weightlayer 1 (gelu)"));
        assert!(printed.contains("Biaslayer 2"));
        assert!(net.scratch().to_string().contains("Output layer"));
    }
}
