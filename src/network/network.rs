use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::hinge::HingeLoss;
use crate::loss::loss_type::LossType;
use crate::math::kernels;
use crate::math::matrix::Matrix;

/// A linear stack of fully-connected layers trained with cross-entropy or
/// hinge loss plus an L2 penalty of strength `lambda`.
///
/// A single-layer network is the plain softmax (or SVM) classifier; deeper
/// stacks put ReLU between layers, with the loss head applied after the
/// final linear output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub lambda: f64,
    pub loss: LossType,
    pub seed: u64,
}

impl Network {
    /// Builds a network from a dimension chain, e.g. `[3072, 50, 10]` for a
    /// one-hidden-layer MLP. Weight initialization is driven entirely by
    /// `seed`; equal seeds produce identical networks.
    pub fn new(dims: &[usize], lambda: f64, loss: LossType, seed: u64) -> Result<Network> {
        if dims.len() < 2 {
            return Err(Error::InvalidShape(format!(
                "need at least an input and an output dimension, got {dims:?}"
            )));
        }
        if dims.iter().any(|&d| d == 0) {
            return Err(Error::InvalidShape(format!(
                "layer dimensions must be positive, got {dims:?}"
            )));
        }
        if lambda < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "regularization strength must be non-negative, got {lambda}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let layers = dims
            .windows(2)
            .map(|pair| Layer::new(pair[0], pair[1], &mut rng))
            .collect();

        Ok(Network { layers, lambda, loss, seed })
    }

    /// Assembles a network from pre-built layers, validating the
    /// dimension-compatibility invariant between adjacent layers.
    pub fn from_layers(layers: Vec<Layer>, lambda: f64, loss: LossType, seed: u64) -> Result<Network> {
        let net = Network { layers, lambda, loss, seed };
        net.validate()?;
        Ok(net)
    }

    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::InvalidShape("network has no layers".into()));
        }
        for layer in &self.layers {
            if layer.weights.rows != layer.d_out
                || layer.weights.cols != layer.d_in
                || layer.biases.rows != layer.d_out
                || layer.biases.cols != 1
            {
                return Err(Error::InvalidShape(format!(
                    "layer parameter shapes do not match d_in={} d_out={}",
                    layer.d_in, layer.d_out
                )));
            }
        }
        for pair in self.layers.windows(2) {
            if pair[0].d_out != pair[1].d_in {
                return Err(Error::InvalidShape(format!(
                    "adjacent layers are incompatible: d_out={} feeds d_in={}",
                    pair[0].d_out, pair[1].d_in
                )));
            }
        }
        if self.lambda < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "regularization strength must be non-negative, got {}",
                self.lambda
            )));
        }
        Ok(())
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].d_in
    }

    pub fn class_count(&self) -> usize {
        self.layers[self.layers.len() - 1].d_out
    }

    /// Forward pass over a batch (feature_dim, batch_size): ReLU between
    /// layers, then the loss head on the final linear output (softmax for
    /// cross-entropy, raw scores for hinge). Each layer caches its input
    /// for the next `compute_gradients` call.
    pub fn forward_pass(&mut self, x: &Matrix) -> Matrix {
        let k = self.layers.len();
        let mut h = x.clone();
        for i in 0..k - 1 {
            h = kernels::relu(&self.layers[i].forward(&h));
        }
        let z = self.layers[k - 1].forward(&h);
        match self.loss {
            LossType::CrossEntropy => kernels::softmax(&z),
            LossType::Hinge => z,
        }
    }

    /// Returns (loss, cost): the raw classification loss and the loss plus
    /// the L2 penalty λ·Σ‖W‖² over all layers (the penalty is not divided
    /// by the batch size).
    pub fn compute_cost(&mut self, x: &Matrix, y: &Matrix) -> (f64, f64) {
        let p = self.forward_pass(x);
        let loss = match self.loss {
            LossType::CrossEntropy => CrossEntropyLoss::loss(&p, y),
            LossType::Hinge => HingeLoss::loss(&p, y),
        };
        let penalty: f64 = self.layers.iter().map(|l| l.weights.frobenius_sq()).sum();
        (loss, loss + self.lambda * penalty)
    }

    /// Backward pass: fills every layer's `grad_w` / `grad_b` from the output
    /// delta, traversing layers in reverse and masking each propagated delta
    /// with the Heaviside derivative of the consuming layer's cached input.
    ///
    /// Precondition: must be called immediately after a `forward_pass` on the
    /// same batch, with `p` being that pass's output. Stale caches are not
    /// detected and silently produce wrong gradients.
    pub fn compute_gradients(&mut self, y: &Matrix, p: &Matrix) {
        let lambda = self.lambda;
        let mut g = match self.loss {
            LossType::CrossEntropy => CrossEntropyLoss::output_delta(p, y),
            LossType::Hinge => HingeLoss::output_delta(p, y),
        };

        let k = self.layers.len();
        for i in (1..k).rev() {
            self.layers[i].accumulate_gradients(&g, lambda);
            g = self.layers[i].weights.transpose() * g;
            // The cached input is the previous layer's ReLU output.
            g = g.hadamard(&kernels::heaviside(&self.layers[i].input));
        }
        self.layers[0].accumulate_gradients(&g, lambda);
    }

    /// SGD step: W -= η grad_W, b -= η grad_b for every layer, in place.
    pub fn update_parameters(&mut self, eta: f64) {
        for layer in &mut self.layers {
            layer.step(eta);
        }
    }

    /// Argmax-decoded class index per sample.
    pub fn predict(&mut self, x: &Matrix) -> Vec<usize> {
        self.forward_pass(x).argmax_cols()
    }

    /// Fraction of samples whose argmax-decoded prediction matches `labels`.
    pub fn compute_accuracy(&mut self, x: &Matrix, labels: &[usize]) -> f64 {
        assert_eq!(x.cols, labels.len(), "batch/label column count mismatch");
        let predictions = self.predict(x);
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(p, l)| p == l)
            .count();
        correct as f64 / labels.len() as f64
    }

    /// Serializes the network parameters to a pretty-printed JSON file.
    /// Layer caches and gradient buffers are skipped.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`, re-validating the layer dimension chain.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let net: Network = serde_json::from_reader(reader)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        net.validate()?;
        Ok(net)
    }
}
