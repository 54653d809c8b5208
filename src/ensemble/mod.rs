//! Ensemble inference over trained snapshots.
//!
//! Cyclic training with a snapshot stem leaves one saved network per
//! completed cycle; this module aggregates their predictions by majority
//! vote at inference time. No parameters are modified here.

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Loads a set of snapshots previously written by `Network::save_json`,
/// e.g. one per cyclic-learning cycle.
pub fn load_snapshots(paths: &[String]) -> Result<Vec<Network>> {
    paths.iter().map(|path| Network::load_json(path)).collect()
}

/// Majority voting over snapshot predictions.
///
/// Each model argmax-decodes a class per sample; the ensemble prediction is
/// the most frequent class. Ties are broken deterministically in favor of
/// the class first encountered in snapshot order. Returns the per-sample
/// predictions and the accuracy against `labels`.
pub fn majority_vote(
    models: &mut [Network],
    x: &Matrix,
    labels: &[usize],
) -> Result<(Vec<usize>, f64)> {
    if models.is_empty() {
        return Err(Error::InvalidConfig("ensemble needs at least one model".into()));
    }
    if x.cols != labels.len() {
        return Err(Error::InvalidData(format!(
            "{} samples but {} labels",
            x.cols,
            labels.len()
        )));
    }
    let classes = models[0].class_count();
    for model in models.iter() {
        if model.input_dim() != x.rows {
            return Err(Error::InvalidShape(format!(
                "snapshot input_dim {} does not match feature_dim {}",
                model.input_dim(),
                x.rows
            )));
        }
        if model.class_count() != classes {
            return Err(Error::InvalidShape(
                "snapshots disagree on class count".into(),
            ));
        }
    }

    let votes: Vec<Vec<usize>> = models.iter_mut().map(|m| m.predict(x)).collect();

    let predictions: Vec<usize> = (0..x.cols)
        .map(|sample| {
            // Tally in first-seen order; a strictly-greater comparison keeps
            // the earliest class on ties.
            let mut tally: Vec<(usize, usize)> = Vec::new();
            for model_votes in &votes {
                let class = model_votes[sample];
                match tally.iter_mut().find(|(c, _)| *c == class) {
                    Some(entry) => entry.1 += 1,
                    None => tally.push((class, 1)),
                }
            }
            let mut winner = tally[0];
            for &candidate in &tally[1..] {
                if candidate.1 > winner.1 {
                    winner = candidate;
                }
            }
            winner.0
        })
        .collect();

    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(p, l)| p == l)
        .count();
    let accuracy = correct as f64 / labels.len() as f64;

    Ok((predictions, accuracy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::dense::Layer;
    use crate::loss::loss_type::LossType;

    /// Single-layer network whose argmax is forced to `class` on any input
    /// with non-negative features.
    fn constant_voter(classes: usize, class: usize) -> Network {
        let mut weights = Matrix::zeros(classes, 1);
        weights.data[class][0] = 1.0;
        let layer = Layer {
            d_in: 1,
            d_out: classes,
            weights,
            biases: Matrix::zeros(classes, 1),
            input: Matrix::default(),
            grad_w: Matrix::default(),
            grad_b: Matrix::default(),
        };
        Network::from_layers(vec![layer], 0.0, LossType::CrossEntropy, 0).unwrap()
    }

    #[test]
    fn two_against_one_wins() {
        let mut models = vec![constant_voter(2, 0), constant_voter(2, 0), constant_voter(2, 1)];
        let x = Matrix::from_data(vec![vec![1.0]]);
        let (predictions, accuracy) = majority_vote(&mut models, &x, &[0]).unwrap();
        assert_eq!(predictions, vec![0]);
        assert_eq!(accuracy, 1.0);
    }

    #[test]
    fn ties_go_to_the_first_snapshot_class() {
        let mut models = vec![constant_voter(3, 2), constant_voter(3, 1)];
        let x = Matrix::from_data(vec![vec![1.0]]);
        let (predictions, _) = majority_vote(&mut models, &x, &[2]).unwrap();
        assert_eq!(predictions, vec![2]);
    }

    #[test]
    fn rejects_empty_ensembles_and_misaligned_labels() {
        let x = Matrix::from_data(vec![vec![1.0]]);
        assert!(majority_vote(&mut [], &x, &[0]).is_err());
        let mut models = vec![constant_voter(2, 0)];
        assert!(majority_vote(&mut models, &x, &[0, 1]).is_err());
    }
}
