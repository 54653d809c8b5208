use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::config::CyclicParams;
use crate::train::dataset::{shuffled_indices, DataSplit};
use crate::train::history::History;

/// Triangular schedule position: the learning rate for the update after
/// in-cycle step `t` (0 <= t < 2 * ns). Ramps from `eta_min` up to
/// `eta_max` over the first `ns` steps and back down over the next `ns`.
pub fn triangular_eta(t: usize, ns: usize, eta_min: f64, eta_max: f64) -> f64 {
    let span = eta_max - eta_min;
    if t <= ns {
        eta_min + t as f64 / ns as f64 * span
    } else {
        eta_max - (t - ns) as f64 / ns as f64 * span
    }
}

/// Minibatch gradient descent with a triangular cyclic learning rate.
///
/// Runs `n_cycles * 2 * ns` update-steps, translated into whole epochs by
/// the config (`CyclicParams::epochs`). History is recorded every
/// `2 * ns / freq` steps rather than per epoch. With `jitter` enabled,
/// each batch is, with probability 0.5, replaced by a noisy re-standardized
/// copy for that step's gradient only; the stored data is untouched.
///
/// When `snapshot_stem` is set the network is saved at the end of every
/// completed cycle, which is the input for ensemble majority voting.
pub fn cyclic_learning(
    net: &mut Network,
    data: &DataSplit,
    params: &CyclicParams,
    history: &mut History,
) -> Result<()> {
    params.validate(data.n_train())?;
    data.check_model(net)?;

    let n = data.n_train();
    let n_batch = params.n_batch;
    let epochs = params.epochs(n);
    let record_every = 2 * params.ns / params.freq;

    let mut x = data.x_train.clone();
    let mut y = data.y_train.clone();

    let mut eta = params.eta_min;
    // `t` wraps at the cycle boundary and drives the schedule; `step` is the
    // monotone global counter used for history labels.
    let mut t = 0usize;
    let mut step = 0usize;
    let mut cycle = 0usize;
    let mut jitter_rng = StdRng::seed_from_u64(params.jitter_seed);

    for epoch in 0..epochs {
        let indices = shuffled_indices(n, epoch as u64);
        x = x.select_cols(&indices);
        y = y.select_cols(&indices);

        for j in 0..n / n_batch {
            let mut x_batch = x.slice_cols(j * n_batch, (j + 1) * n_batch);
            let y_batch = y.slice_cols(j * n_batch, (j + 1) * n_batch);

            if params.jitter && jitter_rng.gen::<f64>() > 0.5 {
                x_batch = random_jitter(&x_batch, 1.0, &mut jitter_rng);
            }

            let p_batch = net.forward_pass(&x_batch);
            net.compute_gradients(&y_batch, &p_batch);
            net.update_parameters(eta);

            if t % record_every == 0 {
                history.record(net, data, step);
            }

            eta = triangular_eta(t, params.ns, params.eta_min, params.eta_max);
            t = (t + 1) % (2 * params.ns);
            step += 1;

            if t == 0 {
                if let Some(stem) = &params.snapshot_stem {
                    let path = params.snapshot_path(stem, net.lambda, net.seed, cycle);
                    net.save_json(&path)?;
                    if history.verbose {
                        println!("Cycle {cycle} saved");
                    }
                }
                cycle += 1;
            }
        }
    }

    Ok(())
}

/// Additive Gaussian noise followed by per-row re-standardization to zero
/// mean and unit variance. A constant row has zero variance and turns
/// non-finite, which propagates by the crate's instability policy.
pub(crate) fn random_jitter(x: &Matrix, sigma: f64, rng: &mut StdRng) -> Matrix {
    let mut out = x.clone();
    for row in &mut out.data {
        for v in row.iter_mut() {
            *v += sigma * Matrix::sample_standard_normal(rng);
        }
    }
    for row in &mut out.data {
        let n = row.len() as f64;
        let mean = row.iter().sum::<f64>() / n;
        let var = row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = var.sqrt();
        for v in row.iter_mut() {
            *v = (*v - mean) / std_dev;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_schedule_hits_its_corners() {
        let (eta_min, eta_max, ns) = (1e-5, 1e-1, 10);
        assert_eq!(triangular_eta(0, ns, eta_min, eta_max), eta_min);
        assert!((triangular_eta(ns, ns, eta_min, eta_max) - eta_max).abs() < 1e-15);
        // Step 2 * ns wraps back to in-cycle step 0.
        assert_eq!(triangular_eta(2 * ns % (2 * ns), ns, eta_min, eta_max), eta_min);
    }

    #[test]
    fn triangular_schedule_is_symmetric() {
        let (eta_min, eta_max, ns) = (0.1, 0.9, 10);
        for t in 0..ns {
            let up = triangular_eta(t, ns, eta_min, eta_max);
            let down = triangular_eta(2 * ns - t, ns, eta_min, eta_max);
            assert!((up - down).abs() < 1e-12);
        }
    }

    #[test]
    fn jitter_standardizes_each_row() {
        let mut rng = StdRng::seed_from_u64(17);
        let x = Matrix::gaussian(3, 50, 2.0, &mut rng);
        let jittered = random_jitter(&x, 1.0, &mut rng);
        for row in &jittered.data {
            let n = row.len() as f64;
            let mean = row.iter().sum::<f64>() / n;
            let var = row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }
}
