use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NetError, Result};
use crate::math::Matrix;
use crate::train::cost::check_rows;

/// Paired training inputs and targets, one sample per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub targets: Matrix,
}

impl Dataset {
    pub fn new(inputs: Matrix, targets: Matrix) -> Result<Dataset> {
        check_rows(&inputs, &targets)?;
        Ok(Dataset { inputs, targets })
    }

    /// Builds a dataset from `(input, target)` pairs, e.g. a logic table.
    pub fn from_pairs(pairs: &[(Vec<f64>, Vec<f64>)]) -> Result<Dataset> {
        let (inputs, targets): (Vec<_>, Vec<_>) = pairs.iter().cloned().unzip();
        Dataset::new(Matrix::from_data(inputs)?, Matrix::from_data(targets)?)
    }

    /// Splits combined rows: the first `input_cols` columns become the input,
    /// the rest the target.
    pub fn split_columns(rows: &Matrix, input_cols: usize) -> Result<Dataset> {
        if input_cols > rows.cols {
            return Err(NetError::Index { index: input_cols, len: rows.cols });
        }
        let (inputs, targets) = rows.data.iter()
            .map(|row| (row[..input_cols].to_vec(), row[input_cols..].to_vec()))
            .unzip();
        Ok(Dataset {
            inputs: Matrix { rows: rows.rows, cols: input_cols, data: inputs },
            targets: Matrix { rows: rows.rows, cols: rows.cols - input_cols, data: targets },
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.rows == 0
    }

    /// Uniformly permutes the samples, keeping each input with its target.
    ///
    /// Fails with `RowMismatch` and leaves both matrices untouched when the
    /// row counts differ.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        check_rows(&self.inputs, &self.targets)?;
        let inputs = std::mem::take(&mut self.inputs.data);
        let targets = std::mem::take(&mut self.targets.data);
        let mut rows: Vec<(Vec<f64>, Vec<f64>)> = inputs.into_iter().zip(targets).collect();
        rows.shuffle(rng);
        let (inputs, targets) = rows.into_iter().unzip();
        self.inputs.data = inputs;
        self.targets.data = targets;
        Ok(())
    }

    /// The two-input XOR truth table.
    pub fn xor() -> Dataset {
        Dataset {
            inputs: Matrix {
                rows: 4,
                cols: 2,
                data: vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            },
            targets: Matrix {
                rows: 4,
                cols: 1,
                data: vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
            },
        }
    }
}
