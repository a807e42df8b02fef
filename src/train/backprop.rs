use crate::error::{NetError, Result};
use crate::math::Matrix;
use crate::network::Network;
use crate::train::cost::check_rows;

impl Network {
    /// Batch-mean gradient of the cost over every sample.
    ///
    /// The result is a network of identical layout whose weights and biases
    /// hold the averaged deltas. The per-sample error signal starts at
    /// `output - target` on the output layer and is pushed backwards through
    /// the weights; activation derivatives are taken on the activation output.
    /// Each weight and bias receives `2 * error * derivative` (times the
    /// incoming activation for weights).
    pub fn backprop_gradient(&self, inputs: &Matrix, targets: &Matrix) -> Result<Network> {
        check_rows(inputs, targets)?;
        let sample_count = inputs.rows;
        if sample_count == 0 {
            return Err(NetError::EmptyDataset);
        }
        if targets.cols != self.output_size() {
            return Err(NetError::shape("backprop", (sample_count, self.output_size()), targets.shape()));
        }

        let last = self.layer_count - 1;
        let mut gradient = self.zeroed_like();
        let mut act = self.scratch();
        let mut err = gradient.scratch();

        for sample in 0..sample_count {
            act.zero();
            err.zero();

            self.forward(&inputs.row(sample)?, &mut act)?;
            for (i, e) in err.layers[last].data[0].iter_mut().enumerate() {
                *e = act.layers[last].data[0][i] - targets.data[sample][i];
            }

            for layer in (1..self.layer_count).rev() {
                let derivative = self.activation_func[layer];
                for j in 0..self.layout[layer] {
                    let a = act.layers[layer].data[0][j];
                    let da = err.layers[layer].data[0][j];
                    let qa = derivative.derivative(a);
                    let delta = 2.0 * da * qa;

                    gradient.biases[layer - 1].data[0][j] += delta;
                    for k in 0..self.layout[layer - 1] {
                        let pa = act.layers[layer - 1].data[0][k];
                        let w = self.weights[layer - 1].data[k][j];
                        gradient.weights[layer - 1].data[k][j] += delta * pa;
                        // The cost's factor of 2 is applied once, above.
                        err.layers[layer - 1].data[0][k] += da * qa * w;
                    }
                }
            }
        }

        let n = sample_count as f64;
        for param in gradient.weights.iter_mut().chain(gradient.biases.iter_mut()) {
            param.apply_in_place(|x| x / n);
        }

        Ok(gradient)
    }

    /// One full-batch gradient-descent step computed by backpropagation.
    pub fn backprop(&mut self, inputs: &Matrix, targets: &Matrix, rate: f64) -> Result<()> {
        let gradient = self.backprop_gradient(inputs, targets)?;
        self.adjust(&gradient, rate)
    }
}
