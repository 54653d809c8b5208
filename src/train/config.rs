use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Step-decay annealing: every `freq` epochs the learning rate is
/// multiplied by `gamma`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Annealing {
    pub gamma: f64,
    pub freq: usize,
}

/// Hyperparameters for one minibatch-epoch gradient-descent run. Read-only
/// for the duration of the run.
///
/// # Fields
/// - `n_epochs`  — full passes over the training data
/// - `n_batch`   — samples per minibatch; trailing samples that do not fill
///                 a batch are dropped, not processed
/// - `eta`       — initial learning rate
/// - `patience`  — early-stopping window; `0` disables early stopping
/// - `annealing` — optional step decay of the learning rate
/// - `reshuffle` — reshuffle the training columns each epoch, seeded with
///                 the epoch index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdParams {
    pub n_epochs: usize,
    pub n_batch: usize,
    pub eta: f64,
    pub patience: usize,
    pub annealing: Option<Annealing>,
    pub reshuffle: bool,
}

impl GdParams {
    pub fn new(n_epochs: usize, n_batch: usize, eta: f64) -> GdParams {
        GdParams {
            n_epochs,
            n_batch,
            eta,
            patience: 0,
            annealing: None,
            reshuffle: false,
        }
    }

    pub(crate) fn validate(&self, n_samples: usize) -> Result<()> {
        check_batch(self.n_batch, n_samples)?;
        if self.n_epochs == 0 {
            return Err(Error::InvalidConfig("n_epochs must be at least 1".into()));
        }
        if self.eta <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.eta
            )));
        }
        if let Some(a) = &self.annealing {
            if !(a.gamma > 0.0 && a.gamma < 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "decay factor must lie in (0, 1), got {}",
                    a.gamma
                )));
            }
            if a.freq == 0 {
                return Err(Error::InvalidConfig("decay frequency must be at least 1".into()));
            }
        }
        Ok(())
    }

    /// Filename key for persisting a run's parameters and history.
    pub fn run_key(&self, lambda: f64, seed: u64) -> String {
        format!(
            "gd_{}_{}_{}_{}_{}_{}",
            self.n_epochs, self.n_batch, self.eta, lambda, self.patience, seed
        )
    }
}

/// Hyperparameters for a cyclic (triangular) learning-rate run.
///
/// One cycle spans `2 * ns` update-steps: the learning rate ramps linearly
/// from `eta_min` to `eta_max` over the first `ns` steps, then back down.
/// The run covers `n_cycles` full cycles, translated into whole epochs as
/// `n_batch * 2 * ns * n_cycles / n` (integer division; a trailing partial
/// epoch is dropped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyclicParams {
    pub n_cycles: usize,
    pub n_batch: usize,
    pub eta_min: f64,
    pub eta_max: f64,
    /// Half-cycle length in update-steps.
    pub ns: usize,
    /// History entries per cycle: one entry every `2 * ns / freq` steps.
    pub freq: usize,
    /// Per-batch Gaussian input jitter with probability 0.5.
    pub jitter: bool,
    /// Seed for the jitter coin and noise, independent of the shuffle seeds.
    pub jitter_seed: u64,
    /// When set, the network is snapshotted to
    /// `<stem>_layers_..._cycle_<c>.json` at the end of every cycle, for
    /// later ensemble voting.
    pub snapshot_stem: Option<String>,
}

impl CyclicParams {
    pub fn new(n_cycles: usize, n_batch: usize, eta_min: f64, eta_max: f64, ns: usize, freq: usize) -> CyclicParams {
        CyclicParams {
            n_cycles,
            n_batch,
            eta_min,
            eta_max,
            ns,
            freq,
            jitter: false,
            jitter_seed: 0,
            snapshot_stem: None,
        }
    }

    pub(crate) fn validate(&self, n_samples: usize) -> Result<()> {
        check_batch(self.n_batch, n_samples)?;
        if self.n_cycles == 0 || self.ns == 0 {
            return Err(Error::InvalidConfig("n_cycles and ns must be at least 1".into()));
        }
        if !(self.eta_min > 0.0 && self.eta_min < self.eta_max) {
            return Err(Error::InvalidConfig(format!(
                "need 0 < eta_min < eta_max, got [{}, {}]",
                self.eta_min, self.eta_max
            )));
        }
        if self.freq == 0 || (2 * self.ns) % self.freq != 0 {
            return Err(Error::InvalidConfig(format!(
                "freq {} must divide the cycle length {}",
                self.freq,
                2 * self.ns
            )));
        }
        if self.epochs(n_samples) == 0 {
            return Err(Error::InvalidConfig(
                "cyclic parameters translate to zero whole epochs".into(),
            ));
        }
        Ok(())
    }

    /// Whole epochs covered by `n_cycles` cycles.
    pub fn epochs(&self, n_samples: usize) -> usize {
        self.n_batch * 2 * self.ns * self.n_cycles / n_samples
    }

    /// Snapshot filename keyed by the run's hyperparameters.
    pub fn snapshot_path(&self, stem: &str, lambda: f64, seed: u64, cycle: usize) -> String {
        format!(
            "{stem}_layers_{}_{}_{}_{}_{}_{}_{}_cycle_{}.json",
            self.n_cycles, self.n_batch, self.eta_min, self.eta_max, self.ns, lambda, seed, cycle
        )
    }
}

/// Hyperparameters for the learning-rate range test: a diagnostic sweep
/// where the learning rate grows linearly from `eta_min` towards `eta_max`
/// by a fixed delta every `freq` batches, recording validation accuracy at
/// each probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeTestParams {
    pub n_epochs: usize,
    pub n_batch: usize,
    pub eta_min: f64,
    pub eta_max: f64,
    /// Batches between probes.
    pub freq: usize,
}

impl RangeTestParams {
    pub fn new(n_epochs: usize, n_batch: usize, eta_min: f64, eta_max: f64, freq: usize) -> RangeTestParams {
        RangeTestParams { n_epochs, n_batch, eta_min, eta_max, freq }
    }

    pub(crate) fn validate(&self, n_samples: usize) -> Result<()> {
        check_batch(self.n_batch, n_samples)?;
        if self.n_epochs == 0 {
            return Err(Error::InvalidConfig("n_epochs must be at least 1".into()));
        }
        if !(self.eta_min > 0.0 && self.eta_min < self.eta_max) {
            return Err(Error::InvalidConfig(format!(
                "need 0 < eta_min < eta_max, got [{}, {}]",
                self.eta_min, self.eta_max
            )));
        }
        if self.freq == 0 {
            return Err(Error::InvalidConfig("probe frequency must be at least 1".into()));
        }
        Ok(())
    }
}

fn check_batch(n_batch: usize, n_samples: usize) -> Result<()> {
    if n_batch == 0 {
        return Err(Error::InvalidConfig("batch size must be at least 1".into()));
    }
    if n_batch > n_samples {
        return Err(Error::InvalidConfig(format!(
            "batch size {n_batch} exceeds sample count {n_samples}"
        )));
    }
    Ok(())
}
