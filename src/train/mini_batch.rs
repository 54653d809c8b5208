use crate::error::Result;
use crate::network::network::Network;
use crate::train::config::GdParams;
use crate::train::dataset::{shuffled_indices, DataSplit};
use crate::train::history::History;

/// Minibatch gradient descent in epoch mode.
///
/// Per epoch: an optional joint reshuffle of the training columns (seeded
/// with the epoch index), then `n / n_batch` contiguous batches of
/// forward, backward and SGD update. History is recorded once before the
/// first epoch (step 0) and after every epoch, always over the full,
/// unshuffled train and validation sets.
///
/// Trailing samples that do not fill a whole batch are dropped. Early
/// stopping (when `patience > 0`) is a deliberate termination path, not an
/// error.
pub fn mini_batch_gd(
    net: &mut Network,
    data: &DataSplit,
    params: &GdParams,
    history: &mut History,
) -> Result<()> {
    params.validate(data.n_train())?;
    data.check_model(net)?;

    let n = data.n_train();
    let n_batch = params.n_batch;
    let mut eta = params.eta;

    // Local working copies; reshuffles chain across epochs while the split
    // itself stays in its original column order for evaluation.
    let mut x = data.x_train.clone();
    let mut y = data.y_train.clone();

    history.record(net, data, 0);

    for epoch in 0..params.n_epochs {
        if params.reshuffle {
            let indices = shuffled_indices(n, epoch as u64);
            x = x.select_cols(&indices);
            y = y.select_cols(&indices);
        }

        for j in 0..n / n_batch {
            let x_batch = x.slice_cols(j * n_batch, (j + 1) * n_batch);
            let y_batch = y.slice_cols(j * n_batch, (j + 1) * n_batch);

            let p_batch = net.forward_pass(&x_batch);
            net.compute_gradients(&y_batch, &p_batch);
            net.update_parameters(eta);
        }

        history.record(net, data, epoch + 1);

        if params.patience > 0 && early_stopping(&history.val_losses(), params.patience) {
            if history.verbose {
                println!("Early stopping @ epoch {epoch}");
            }
            break;
        }

        if let Some(a) = &params.annealing {
            if (epoch + 1) % a.freq == 0 {
                eta *= a.gamma;
            }
        }
    }

    Ok(())
}

/// Fires when the validation loss has strictly increased over each of the
/// most recent `patience` recorded entries, and only once more than
/// `2 * patience` entries exist. Ties do not count as deterioration.
pub fn early_stopping(val_loss: &[f64], patience: usize) -> bool {
    if patience == 0 {
        return false;
    }
    if val_loss.len() > 2 * patience {
        let tail = &val_loss[val_loss.len() - patience - 1..];
        tail.windows(2).all(|pair| pair[0] < pair[1])
    } else {
        false
    }
}
