use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// One fully-connected transform: z = W x + b, with samples as columns.
///
/// The cached input and gradient buffers are scratch state: they are
/// overwritten by every forward/backward pairing and are only meaningful
/// between a forward pass and the matching gradient computation. They are
/// never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub d_in: usize,
    pub d_out: usize,
    /// Weight matrix, shape (d_out, d_in).
    pub weights: Matrix,
    /// Bias column vector, shape (d_out, 1).
    pub biases: Matrix,
    /// Input of the last forward pass, shape (d_in, batch_size).
    #[serde(skip)]
    pub input: Matrix,
    #[serde(skip)]
    pub grad_w: Matrix,
    #[serde(skip)]
    pub grad_b: Matrix,
}

impl Layer {
    /// Weights from N(0, 1/√d_in), biases zero.
    pub fn new(d_in: usize, d_out: usize, rng: &mut impl Rng) -> Layer {
        Layer {
            d_in,
            d_out,
            weights: Matrix::gaussian(d_out, d_in, 1.0 / (d_in as f64).sqrt(), rng),
            biases: Matrix::zeros(d_out, 1),
            input: Matrix::default(),
            grad_w: Matrix::default(),
            grad_b: Matrix::default(),
        }
    }

    /// Linear forward: caches `x` and returns W x + b (no activation; the
    /// network applies ReLU between layers and the loss head after the last).
    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        self.input = x.clone();
        self.weights.clone() * x.clone() + self.biases.broadcast_cols(x.cols)
    }

    /// Parameter gradients from the upstream delta `g` (d_out, batch_size):
    ///   grad_W = g xᵀ / nb + 2 λ W
    ///   grad_b = row-sums(g) / nb
    /// Overwrites `grad_w` / `grad_b` in place.
    pub fn accumulate_gradients(&mut self, g: &Matrix, lambda: f64) {
        let nb = self.input.cols as f64;
        self.grad_w = (g.clone() * self.input.transpose()).map(|v| v / nb)
            + self.weights.map(|w| 2.0 * lambda * w);
        self.grad_b = g.row_sums().map(|v| v / nb);
    }

    /// Applies the stored gradients scaled by `eta` (plain SGD step).
    pub fn step(&mut self, eta: f64) {
        self.weights = self.weights.clone() - self.grad_w.map(|v| v * eta);
        self.biases = self.biases.clone() - self.grad_b.map(|v| v * eta);
    }
}
