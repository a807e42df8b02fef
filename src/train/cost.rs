use crate::error::{NetError, Result};
use crate::math::Matrix;
use crate::network::Network;

pub(crate) fn check_rows(inputs: &Matrix, targets: &Matrix) -> Result<()> {
    if inputs.rows != targets.rows {
        return Err(NetError::RowMismatch { inputs: inputs.rows, targets: targets.rows });
    }
    Ok(())
}

impl Network {
    /// Total cost over every sample row.
    ///
    /// Per sample the residual `target - output` is summed into one scalar
    /// and that sum is squared. This is not the per-component squared error,
    /// and the total is not averaged.
    pub fn cost(&self, inputs: &Matrix, targets: &Matrix) -> Result<f64> {
        check_rows(inputs, targets)?;

        let mut scratch = self.scratch();
        let mut cost = 0.0;
        for sample in 0..inputs.rows {
            let output = self.forward(&inputs.row(sample)?, &mut scratch)?;
            let got = output.map(|x| -x);
            let residual = targets.row(sample)?.sum(&got)?.total();
            cost += residual * residual;
        }
        Ok(cost)
    }
}
