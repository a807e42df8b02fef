use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NetError, Result};

/// Dense row-major matrix of `f64`.
///
/// Invariant: `data` holds exactly `rows` rows of exactly `cols` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Builds a `rows × cols` matrix, calling `generator` once per cell in
    /// row-major order.
    pub fn new<F>(rows: usize, cols: usize, mut generator: F) -> Matrix
    where
        F: FnMut() -> f64,
    {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| generator()).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Wraps a grid of rows. Fails if the rows are ragged.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NetError::shape("from_data", (rows, cols), (rows, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A `1 × n` matrix holding `values`.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_entry(row, col)?;
        Ok(self.data[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_entry(row, col)?;
        self.data[row][col] = value;
        Ok(())
    }

    fn check_entry(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(NetError::Index { index: row, len: self.rows });
        }
        if col >= self.cols {
            return Err(NetError::Index { index: col, len: self.cols });
        }
        Ok(())
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NetError::shape("dot", (self.cols, rhs.cols), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Elementwise sum of two same-shape matrices.
    pub fn sum(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.shape() != rhs.shape() {
            return Err(NetError::shape("sum", self.shape(), rhs.shape()));
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(a, b)| a + b).collect())
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Copy of row `index` as a `1 × cols` matrix.
    pub fn row(&self, index: usize) -> Result<Matrix> {
        self.data
            .get(index)
            .map(|row| Matrix::row_vector(row.clone()))
            .ok_or(NetError::Index { index, len: self.rows })
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        let mut res = self.clone();
        res.apply_in_place(functor);
        res
    }

    pub fn apply_in_place<F>(&mut self, functor: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in self.data.iter_mut().flat_map(|row| row.iter_mut()) {
            *x = functor(*x);
        }
    }

    pub fn fill(&mut self, value: f64) {
        for row in &mut self.data {
            row.fill(value);
        }
    }

    /// Uniformly permutes the rows in place.
    pub fn shuffle_rows<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.data.shuffle(rng);
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.data.iter().flat_map(|row| row.iter()).sum()
    }

    /// Writes the matrix between `[ label` and `]`, one row per line.
    pub fn write_labeled(&self, f: &mut impl fmt::Write, label: &str) -> fmt::Result {
        writeln!(f, "[ {label}")?;
        for row in &self.data {
            for x in row {
                write!(f, "{x:5.2} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "]")
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_labeled(f, "matrix")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn generator_called_once_per_cell() {
        let mut calls = 0;
        let mat = Matrix::new(3, 4, || {
            calls += 1;
            calls as f64
        });
        assert_eq!(calls, 12);
        assert_eq!(mat.shape(), (3, 4));
        assert_eq!(mat.data[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(mat.data[2][3], 12.0);
    }

    #[test]
    fn dot_shapes_and_values() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);
        let c = a.dot(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.data, vec![vec![58.0, 64.0], vec![139.0, 154.0]]);
    }

    #[test]
    fn dot_identity_is_noop() {
        let a = m(vec![vec![1.5, -2.0], vec![0.25, 4.0], vec![3.0, 3.0]]);
        assert_eq!(Matrix::identity(3).dot(&a).unwrap(), a);
    }

    #[test]
    fn dot_rejects_bad_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(a.dot(&b), Err(NetError::Dimension { op: "dot", .. })));
    }

    #[test]
    fn sum_rejects_bad_shapes() {
        let a = Matrix::zeros(1, 3);
        let b = Matrix::zeros(1, 2);
        assert!(matches!(a.sum(&b), Err(NetError::Dimension { op: "sum", .. })));
    }

    #[test]
    fn transpose_twice_is_identity() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.data[2][1], 6.0);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn row_out_of_bounds() {
        let a = Matrix::zeros(2, 2);
        assert!(a.row(1).is_ok());
        assert!(matches!(a.row(2), Err(NetError::Index { index: 2, len: 2 })));
        assert!(a.get(0, 5).is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn apply_and_fill() {
        let mut a = m(vec![vec![1.0, -2.0]]);
        a.apply_in_place(|x| x * 3.0);
        assert_eq!(a.data[0], vec![3.0, -6.0]);
        a.fill(0.5);
        assert_eq!(a.total(), 1.0);
    }

    #[test]
    fn shuffle_keeps_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        let original = Matrix::new(20, 2, {
            let mut i = 0.0;
            move || {
                i += 1.0;
                i
            }
        });
        let mut shuffled = original.clone();
        shuffled.shuffle_rows(&mut rng);

        let mut a = original.data.clone();
        let mut b = shuffled.data.clone();
        a.sort_by(|x, y| x[0].partial_cmp(&y[0]).unwrap());
        b.sort_by(|x, y| x[0].partial_cmp(&y[0]).unwrap());
        assert_eq!(a, b);
        assert_ne!(original, shuffled);
    }

    #[test]
    fn display_is_labeled() {
        let mut out = String::new();
        m(vec![vec![1.0, 2.0]]).write_labeled(&mut out, "w").unwrap();
        assert_eq!(out, "[ w\n 1.00  2.00 \n]\n");
    }
}
