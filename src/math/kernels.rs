//! Numeric kernels shared by every layer.

use crate::math::matrix::Matrix;

/// Column-wise softmax: exp(z) / Σ exp(z) per column.
///
/// Known limitation: no max-subtraction is applied before exponentiating, so
/// very large logits overflow to infinity and the affected column turns into
/// NaN. The non-finite values propagate to cost and gradients on purpose so
/// callers can detect divergence (see the crate error policy).
pub fn softmax(z: &Matrix) -> Matrix {
    let exp = z.map(f64::exp);
    let mut res = Matrix::zeros(z.rows, z.cols);
    for j in 0..z.cols {
        let total: f64 = (0..z.rows).map(|i| exp.data[i][j]).sum();
        for i in 0..z.rows {
            res.data[i][j] = exp.data[i][j] / total;
        }
    }
    res
}

/// Element-wise ReLU: max(0, z).
pub fn relu(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// Heaviside step, the derivative surrogate for ReLU (0 at z = 0).
pub fn heaviside(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { 1.0 } else { 0.0 })
}
