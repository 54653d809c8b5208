//! Numerical gradient verification.
//!
//! Validates the hand-derived backprop formulas against a model-free ground
//! truth: every scalar parameter is perturbed by ±h and the cost difference
//! gives a centered finite-difference estimate of its gradient. This costs
//! O(parameter_count) full cost evaluations and is strictly a development
//! diagnostic, never part of the training loop.

use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Per-layer comparison between analytic and numerical gradients.
///
/// Relative errors use `|a - n| / max(eps, |a| + |n|)`, which avoids false
/// positives when both gradients are near zero.
#[derive(Debug, Clone)]
pub struct LayerErrors {
    pub rel_w: Matrix,
    pub rel_b: Matrix,
    pub abs_w: Matrix,
    pub abs_b: Matrix,
}

impl LayerErrors {
    /// Mean relative error over (weights, biases).
    pub fn mean_rel(&self) -> (f64, f64) {
        (self.rel_w.mean(), self.rel_b.mean())
    }

    /// Mean absolute error over (weights, biases).
    pub fn mean_abs(&self) -> (f64, f64) {
        (self.abs_w.mean(), self.abs_b.mean())
    }
}

/// Centered finite-difference gradients, (grad_W, grad_b) per layer.
///
/// Each probe perturbs one scalar, evaluates the full cost twice, and
/// restores the scalar before moving on, so the network parameters are
/// bit-identical afterwards and subsequent training is unaffected.
pub fn numerical_gradients(
    net: &mut Network,
    x: &Matrix,
    y: &Matrix,
    h: f64,
) -> Vec<(Matrix, Matrix)> {
    let k = net.layers.len();
    let mut grads = Vec::with_capacity(k);

    for j in 0..k {
        let (d_out, d_in) = (net.layers[j].d_out, net.layers[j].d_in);
        let mut grad_w = Matrix::zeros(d_out, d_in);
        let mut grad_b = Matrix::zeros(d_out, 1);

        for i in 0..d_out {
            let orig = net.layers[j].biases.data[i][0];
            net.layers[j].biases.data[i][0] = orig + h;
            let (_, c1) = net.compute_cost(x, y);
            net.layers[j].biases.data[i][0] = orig - h;
            let (_, c2) = net.compute_cost(x, y);
            net.layers[j].biases.data[i][0] = orig;
            grad_b.data[i][0] = (c1 - c2) / (2.0 * h);
        }

        for r in 0..d_out {
            for c in 0..d_in {
                let orig = net.layers[j].weights.data[r][c];
                net.layers[j].weights.data[r][c] = orig + h;
                let (_, c1) = net.compute_cost(x, y);
                net.layers[j].weights.data[r][c] = orig - h;
                let (_, c2) = net.compute_cost(x, y);
                net.layers[j].weights.data[r][c] = orig;
                grad_w.data[r][c] = (c1 - c2) / (2.0 * h);
            }
        }

        grads.push((grad_w, grad_b));
    }

    grads
}

/// Runs a fresh forward/backward pass for the analytic gradients, then the
/// numerical estimate, and returns the per-layer error arrays.
pub fn compare_gradients(
    net: &mut Network,
    x: &Matrix,
    y: &Matrix,
    eps: f64,
    h: f64,
) -> Vec<LayerErrors> {
    let p = net.forward_pass(x);
    net.compute_gradients(y, &p);
    let analytic: Vec<(Matrix, Matrix)> = net
        .layers
        .iter()
        .map(|layer| (layer.grad_w.clone(), layer.grad_b.clone()))
        .collect();

    let numeric = numerical_gradients(net, x, y, h);

    let rel = move |a: f64, n: f64| (a - n).abs() / eps.max(a.abs() + n.abs());

    analytic
        .into_iter()
        .zip(numeric)
        .map(|((aw, ab), (nw, nb))| LayerErrors {
            rel_w: aw.zip_map(&nw, rel),
            rel_b: ab.zip_map(&nb, rel),
            abs_w: aw.zip_map(&nw, |a, n| (a - n).abs()),
            abs_b: ab.zip_map(&nb, |a, n| (a - n).abs()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::loss_type::LossType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_batch(dim: usize, classes: usize, n: usize, seed: u64) -> (Matrix, Matrix) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x = Matrix::gaussian(dim, n, 1.0, &mut rng);
        let mut y = Matrix::zeros(classes, n);
        for j in 0..n {
            y.data[j % classes][j] = 1.0;
        }
        (x, y)
    }

    #[test]
    fn analytic_matches_numeric_for_single_layer_classifier() {
        let (x, y) = random_batch(5, 3, 4, 21);
        let mut net = Network::new(&[5, 3], 0.01, LossType::CrossEntropy, 21).unwrap();
        for errors in compare_gradients(&mut net, &x, &y, 1e-10, 1e-5) {
            let (rel_w, rel_b) = errors.mean_rel();
            assert!(rel_w < 1e-6, "weight gradient mismatch: {rel_w}");
            assert!(rel_b < 1e-6, "bias gradient mismatch: {rel_b}");
            let (abs_w, abs_b) = errors.mean_abs();
            assert!(abs_w < 1e-7, "weight gradient deviation: {abs_w}");
            assert!(abs_b < 1e-7, "bias gradient deviation: {abs_b}");
        }
    }

    #[test]
    fn analytic_matches_numeric_for_two_layer_mlp() {
        let (x, y) = random_batch(4, 3, 4, 33);
        let mut net = Network::new(&[4, 6, 3], 0.01, LossType::CrossEntropy, 33).unwrap();
        for errors in compare_gradients(&mut net, &x, &y, 1e-10, 1e-5) {
            let (rel_w, rel_b) = errors.mean_rel();
            assert!(rel_w < 1e-6, "weight gradient mismatch: {rel_w}");
            assert!(rel_b < 1e-6, "bias gradient mismatch: {rel_b}");
        }
    }

    #[test]
    fn probing_restores_every_parameter() {
        let (x, y) = random_batch(4, 2, 3, 5);
        let mut net = Network::new(&[4, 2], 0.0, LossType::CrossEntropy, 5).unwrap();
        let before_w = net.layers[0].weights.clone();
        let before_b = net.layers[0].biases.clone();
        numerical_gradients(&mut net, &x, &y, 1e-5);
        assert_eq!(net.layers[0].weights, before_w);
        assert_eq!(net.layers[0].biases, before_b);
    }
}
