use crate::math::matrix::Matrix;

/// Multi-class hinge (SVM) loss over raw class scores.
pub struct HingeLoss;

impl HingeLoss {
    /// Mean over the batch of Σ_{i≠y} max(0, s_i - s_y + 1).
    ///
    /// `scores` — raw class scores, shape (class_count, batch_size)
    /// `y`      — one-hot targets, same shape
    pub fn loss(scores: &Matrix, y: &Matrix) -> f64 {
        assert_eq!(scores.rows, y.rows);
        assert_eq!(scores.cols, y.cols);
        let true_class = y.argmax_cols();
        let total: f64 = (0..scores.cols)
            .map(|j| {
                let s_true = scores.data[true_class[j]][j];
                (0..scores.rows)
                    .filter(|&i| i != true_class[j])
                    .map(|i| (scores.data[i][j] - s_true + 1.0).max(0.0))
                    .sum::<f64>()
            })
            .sum();
        total / scores.cols as f64
    }

    /// Subgradient of the hinge loss w.r.t. the scores, as the initial delta
    /// of the backward pass: 1 for each class with a positive margin, minus
    /// the margin-violation count at the true class.
    pub fn output_delta(scores: &Matrix, y: &Matrix) -> Matrix {
        assert_eq!(scores.rows, y.rows);
        assert_eq!(scores.cols, y.cols);
        let true_class = y.argmax_cols();
        let mut g = Matrix::zeros(scores.rows, scores.cols);
        for j in 0..scores.cols {
            let yc = true_class[j];
            let s_true = scores.data[yc][j];
            let mut violations = 0usize;
            for i in 0..scores.rows {
                if i == yc {
                    continue;
                }
                if scores.data[i][j] - s_true + 1.0 > 0.0 {
                    g.data[i][j] = 1.0;
                    violations += 1;
                }
            }
            g.data[yc][j] = -(violations as f64);
        }
        g
    }
}
