use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

/// Dense row-major matrix. Batches are stored one sample per column, so a
/// feature batch has shape (feature_dim, batch_size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data[0].len(),
            data,
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    pub(crate) fn sample_standard_normal(rng: &mut impl Rng) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Gaussian initialization: samples from N(0, std_dev²).
    ///
    /// Layer weights use std_dev = 1/√d_in, which breaks symmetry while
    /// keeping the initial activation variance independent of the fan-in.
    pub fn gaussian(rows: usize, cols: usize, std_dev: f64, rng: &mut impl Rng) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
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

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    /// Element-wise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, rhs: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(self.rows, rhs.rows);
        assert_eq!(self.cols, rhs.cols);
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| functor(x, y)).collect()
            })
            .collect();
        Matrix::from_data(data)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_map(rhs, |x, y| x * y)
    }

    /// Repeats a single-column matrix across `cols` columns (bias broadcast).
    pub fn broadcast_cols(&self, cols: usize) -> Matrix {
        assert_eq!(self.cols, 1, "broadcast_cols requires a column vector");
        let mut res = Matrix::zeros(self.rows, cols);
        for i in 0..self.rows {
            for j in 0..cols {
                res.data[i][j] = self.data[i][0];
            }
        }
        res
    }

    /// Sums every row into a single column vector.
    pub fn row_sums(&self) -> Matrix {
        let mut res = Matrix::zeros(self.rows, 1);
        for i in 0..self.rows {
            res.data[i][0] = self.data[i].iter().sum();
        }
        res
    }

    /// Squared Frobenius norm: Σ w².
    pub fn frobenius_sq(&self) -> f64 {
        self.data.iter()
            .map(|row| row.iter().map(|x| x * x).sum::<f64>())
            .sum()
    }

    /// Mean over all entries.
    pub fn mean(&self) -> f64 {
        let total: f64 = self.data.iter().map(|row| row.iter().sum::<f64>()).sum();
        total / (self.rows * self.cols) as f64
    }

    /// Row index of the maximum entry in each column.
    pub fn argmax_cols(&self) -> Vec<usize> {
        (0..self.cols)
            .map(|j| {
                let mut best = 0;
                for i in 1..self.rows {
                    if self.data[i][j] > self.data[best][j] {
                        best = i;
                    }
                }
                best
            })
            .collect()
    }

    /// Copies the contiguous column range [start, end).
    pub fn slice_cols(&self, start: usize, end: usize) -> Matrix {
        assert!(start <= end && end <= self.cols, "column range out of bounds");
        let data = self.data.iter()
            .map(|row| row[start..end].to_vec())
            .collect();
        Matrix::from_data(data)
    }

    /// Reorders columns by the given index permutation.
    pub fn select_cols(&self, indices: &[usize]) -> Matrix {
        let data = self.data.iter()
            .map(|row| indices.iter().map(|&j| row[j]).collect())
            .collect();
        Matrix::from_data(data)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        self.zip_map(&rhs, |x, y| x + y)
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        self.zip_map(&rhs, |x, y| x - y)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
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

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn matmul_and_transpose() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0], vec![6.0]]);
        let c = a.clone() * b;
        assert_eq!(c.data, vec![vec![17.0], vec![39.0]]);
        assert_eq!(a.transpose().data, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn gaussian_is_reproducible_for_equal_seeds() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let a = Matrix::gaussian(3, 4, 0.5, &mut rng1);
        let b = Matrix::gaussian(3, 4, 0.5, &mut rng2);
        assert_eq!(a, b);
    }

    #[test]
    fn broadcast_and_row_sums() {
        let b = Matrix::from_data(vec![vec![1.0], vec![2.0]]);
        let wide = b.broadcast_cols(3);
        assert_eq!(wide.data, vec![vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]]);
        assert_eq!(wide.row_sums().data, vec![vec![3.0], vec![6.0]]);
    }

    #[test]
    fn argmax_and_column_slicing() {
        let m = Matrix::from_data(vec![vec![0.1, 0.9, 0.2], vec![0.8, 0.1, 0.7]]);
        assert_eq!(m.argmax_cols(), vec![1, 0, 1]);
        assert_eq!(m.slice_cols(1, 3).data, vec![vec![0.9, 0.2], vec![0.1, 0.7]]);
        assert_eq!(m.select_cols(&[2, 0]).data, vec![vec![0.2, 0.1], vec![0.7, 0.8]]);
    }

    #[test]
    fn frobenius_squared() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![2.0, 1.0]]);
        assert!((m.frobenius_sq() - 10.0).abs() < 1e-12);
    }
}
