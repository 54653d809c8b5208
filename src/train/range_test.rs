use crate::error::Result;
use crate::network::network::Network;
use crate::train::config::RangeTestParams;
use crate::train::dataset::{shuffled_indices, DataSplit};

/// Learning-rate range test: trains with a learning rate that grows by a
/// fixed delta every `freq` batches across the epoch budget, recording
/// validation accuracy at every probe. The resulting (etas, accuracies)
/// curve is used to bracket `eta_min` / `eta_max` for cyclic training.
pub fn lr_range_test(
    net: &mut Network,
    data: &DataSplit,
    params: &RangeTestParams,
) -> Result<(Vec<f64>, Vec<f64>)> {
    params.validate(data.n_train())?;
    data.check_model(net)?;

    let n = data.n_train();
    let n_batch = params.n_batch;
    let batches = n / n_batch;
    let delta_eta =
        (params.eta_max - params.eta_min) / (batches * params.n_epochs) as f64 * params.freq as f64;

    let mut x = data.x_train.clone();
    let mut y = data.y_train.clone();

    let mut eta = params.eta_min;
    let mut etas = vec![eta];
    let mut val_accs = vec![net.compute_accuracy(&data.x_val, &data.labels_val)];

    for epoch in 0..params.n_epochs {
        let indices = shuffled_indices(n, epoch as u64);
        x = x.select_cols(&indices);
        y = y.select_cols(&indices);

        for j in 0..batches {
            let x_batch = x.slice_cols(j * n_batch, (j + 1) * n_batch);
            let y_batch = y.slice_cols(j * n_batch, (j + 1) * n_batch);

            let p_batch = net.forward_pass(&x_batch);
            net.compute_gradients(&y_batch, &p_batch);
            net.update_parameters(eta);

            if j % params.freq == 0 {
                eta += delta_eta;
                etas.push(eta);
                val_accs.push(net.compute_accuracy(&data.x_val, &data.labels_val));
            }
        }
    }

    Ok((etas, val_accs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::loss_type::LossType;
    use crate::math::matrix::Matrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_split(n: usize) -> DataSplit {
        let mut rng = StdRng::seed_from_u64(40);
        let mut x = Matrix::gaussian(2, n, 0.2, &mut rng);
        let mut y = Matrix::zeros(2, n);
        let mut labels = Vec::with_capacity(n);
        for j in 0..n {
            let class = j % 2;
            let sign = if class == 0 { -1.0 } else { 1.0 };
            x.data[0][j] += sign;
            x.data[1][j] += sign;
            y.data[class][j] = 1.0;
            labels.push(class);
        }
        DataSplit::new(x.clone(), y.clone(), labels.clone(), x, y, labels).unwrap()
    }

    #[test]
    fn probes_sweep_linearly_from_eta_min_to_eta_max() {
        let data = toy_split(8);
        let mut net = Network::new(&[2, 2], 0.0, LossType::CrossEntropy, 6).unwrap();
        let params = RangeTestParams::new(1, 4, 0.01, 0.05, 1);
        let (etas, accs) = lr_range_test(&mut net, &data, &params).unwrap();

        // 2 batches, one probe per batch: initial eta plus 2 probes.
        assert_eq!(etas.len(), 3);
        assert_eq!(accs.len(), 3);
        assert_eq!(etas[0], 0.01);
        assert!((etas[2] - 0.05).abs() < 1e-12);
        assert!(etas.windows(2).all(|pair| pair[1] > pair[0]));
    }
}
