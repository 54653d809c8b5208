use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Training and validation data for one run.
///
/// Features are (feature_dim, n) with one sample per column, one-hot targets
/// are (class_count, n), and `labels_*` hold the matching integer class
/// indices. Column order is the batch index and must agree across all three.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub x_train: Matrix,
    pub y_train: Matrix,
    pub labels_train: Vec<usize>,
    pub x_val: Matrix,
    pub y_val: Matrix,
    pub labels_val: Vec<usize>,
}

impl DataSplit {
    pub fn new(
        x_train: Matrix,
        y_train: Matrix,
        labels_train: Vec<usize>,
        x_val: Matrix,
        y_val: Matrix,
        labels_val: Vec<usize>,
    ) -> Result<DataSplit> {
        check_part("train", &x_train, &y_train, &labels_train)?;
        check_part("val", &x_val, &y_val, &labels_val)?;
        if x_train.rows != x_val.rows {
            return Err(Error::InvalidData(format!(
                "train feature_dim {} does not match val feature_dim {}",
                x_train.rows, x_val.rows
            )));
        }
        if y_train.rows != y_val.rows {
            return Err(Error::InvalidData(format!(
                "train class_count {} does not match val class_count {}",
                y_train.rows, y_val.rows
            )));
        }
        Ok(DataSplit { x_train, y_train, labels_train, x_val, y_val, labels_val })
    }

    pub fn n_train(&self) -> usize {
        self.x_train.cols
    }

    pub fn feature_dim(&self) -> usize {
        self.x_train.rows
    }

    pub fn class_count(&self) -> usize {
        self.y_train.rows
    }

    /// Eager shape check between this split and a network, run at
    /// training-loop entry.
    pub(crate) fn check_model(&self, net: &Network) -> Result<()> {
        if net.input_dim() != self.feature_dim() {
            return Err(Error::InvalidShape(format!(
                "network input_dim {} does not match feature_dim {}",
                net.input_dim(),
                self.feature_dim()
            )));
        }
        if net.class_count() != self.class_count() {
            return Err(Error::InvalidShape(format!(
                "network class_count {} does not match one-hot rows {}",
                net.class_count(),
                self.class_count()
            )));
        }
        Ok(())
    }
}

fn check_part(name: &str, x: &Matrix, y: &Matrix, labels: &[usize]) -> Result<()> {
    if x.cols == 0 {
        return Err(Error::InvalidData(format!("{name} split is empty")));
    }
    if x.cols != y.cols || x.cols != labels.len() {
        return Err(Error::InvalidData(format!(
            "{name} split misaligned: {} feature columns, {} one-hot columns, {} labels",
            x.cols,
            y.cols,
            labels.len()
        )));
    }
    for (j, &label) in labels.iter().enumerate() {
        if label >= y.rows {
            return Err(Error::InvalidData(format!(
                "{name} label {label} at column {j} exceeds class count {}",
                y.rows
            )));
        }
        let col_sum: f64 = (0..y.rows).map(|i| y.data[i][j]).sum();
        if (col_sum - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidData(format!(
                "{name} one-hot column {j} sums to {col_sum}, expected 1"
            )));
        }
        if (y.data[label][j] - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidData(format!(
                "{name} one-hot column {j} does not encode label {label}"
            )));
        }
    }
    Ok(())
}

/// Deterministic permutation of 0..n for the per-epoch reshuffle. Seeding
/// with the epoch index reproduces a run exactly while still varying batch
/// composition across epochs.
pub(crate) fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onehot(labels: &[usize], classes: usize) -> Matrix {
        let mut y = Matrix::zeros(classes, labels.len());
        for (j, &l) in labels.iter().enumerate() {
            y.data[l][j] = 1.0;
        }
        y
    }

    #[test]
    fn accepts_aligned_split() {
        let x = Matrix::zeros(3, 4);
        let labels = vec![0, 1, 1, 0];
        let y = onehot(&labels, 2);
        assert!(DataSplit::new(x.clone(), y.clone(), labels.clone(), x, y, labels).is_ok());
    }

    #[test]
    fn rejects_column_count_mismatch() {
        let x = Matrix::zeros(3, 4);
        let labels = vec![0, 1, 1];
        let y = onehot(&labels, 2);
        assert!(DataSplit::new(x.clone(), y.clone(), labels.clone(), x, y, labels).is_err());
    }

    #[test]
    fn rejects_invalid_one_hot_columns() {
        let x = Matrix::zeros(3, 2);
        let labels = vec![0, 1];
        let mut y = onehot(&labels, 2);
        y.data[0][1] = 0.5;
        assert!(
            DataSplit::new(x.clone(), y.clone(), labels.clone(), x, onehot(&labels, 2), labels)
                .is_err()
        );
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        assert_eq!(shuffled_indices(10, 3), shuffled_indices(10, 3));
        assert_ne!(shuffled_indices(10, 3), shuffled_indices(10, 4));
    }
}
