use crate::math::matrix::Matrix;

/// Categorical cross-entropy over a softmax output.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Mean over the batch of -log Σ (Y ⊙ P) per column.
    ///
    /// `p` — softmax probabilities, shape (class_count, batch_size)
    /// `y` — one-hot targets, same shape
    ///
    /// No epsilon is folded into the log: a true-class probability of
    /// exactly zero yields +∞, which propagates so callers can detect
    /// divergence.
    pub fn loss(p: &Matrix, y: &Matrix) -> f64 {
        assert_eq!(p.rows, y.rows);
        assert_eq!(p.cols, y.cols);
        let total: f64 = (0..p.cols)
            .map(|j| {
                let true_prob: f64 = (0..p.rows).map(|i| y.data[i][j] * p.data[i][j]).sum();
                -true_prob.ln()
            })
            .sum();
        total / p.cols as f64
    }

    /// Gradient of the combined softmax + cross-entropy w.r.t. the
    /// pre-softmax logits: G = P - Y. This is the initial delta of the
    /// backward pass.
    pub fn output_delta(p: &Matrix, y: &Matrix) -> Matrix {
        p.zip_map(y, |pi, yi| pi - yi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_small_for_confident_correct_prediction() {
        let p = Matrix::from_data(vec![vec![0.99], vec![0.01]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        assert!(CrossEntropyLoss::loss(&p, &y) < 0.02);
    }

    #[test]
    fn loss_is_infinite_when_true_class_probability_is_zero() {
        let p = Matrix::from_data(vec![vec![0.0], vec![1.0]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        assert!(CrossEntropyLoss::loss(&p, &y).is_infinite());
    }

    #[test]
    fn output_delta_is_p_minus_y() {
        let p = Matrix::from_data(vec![vec![0.7], vec![0.3]]);
        let y = Matrix::from_data(vec![vec![1.0], vec![0.0]]);
        let g = CrossEntropyLoss::output_delta(&p, &y);
        assert!((g.data[0][0] + 0.3).abs() < 1e-12);
        assert!((g.data[1][0] - 0.3).abs() < 1e-12);
    }
}
