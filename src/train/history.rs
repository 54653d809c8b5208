use std::sync::mpsc;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::dataset::DataSplit;

/// Granularity of the recorded steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Epoch,
    UpdateStep,
}

impl StepKind {
    fn prefix(self) -> &'static str {
        match self {
            StepKind::Epoch => "Epoch",
            StepKind::UpdateStep => "Update step",
        }
    }
}

/// One recorded evaluation of the network over the full train and
/// validation sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub step: usize,
    pub train_loss: f64,
    pub val_loss: f64,
    pub train_cost: f64,
    pub val_cost: f64,
    pub train_acc: f64,
    pub val_acc: f64,
}

/// Append-only training history, ordered by recording sequence.
///
/// With `verbose` set, each recorded point is printed in one line. When a
/// progress channel is attached, each point is also sent to it; a dropped
/// receiver only stops the reporting, never the training run.
pub struct History {
    pub points: Vec<HistoryPoint>,
    pub kind: StepKind,
    pub verbose: bool,
    progress_tx: Option<mpsc::Sender<HistoryPoint>>,
}

impl History {
    pub fn new(kind: StepKind, verbose: bool) -> History {
        History { points: Vec::new(), kind, verbose, progress_tx: None }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<HistoryPoint>) -> History {
        self.progress_tx = Some(tx);
        self
    }

    /// Evaluates cost and accuracy over the entire train and validation sets
    /// and appends one point. NaN/Inf from a diverged network is recorded
    /// as-is so monitoring can detect it post hoc.
    pub fn record(&mut self, net: &mut Network, data: &DataSplit, step: usize) {
        let (train_loss, train_cost) = net.compute_cost(&data.x_train, &data.y_train);
        let (val_loss, val_cost) = net.compute_cost(&data.x_val, &data.y_val);
        let train_acc = net.compute_accuracy(&data.x_train, &data.labels_train);
        let val_acc = net.compute_accuracy(&data.x_val, &data.labels_val);

        let point = HistoryPoint {
            step,
            train_loss,
            val_loss,
            train_cost,
            val_cost,
            train_acc,
            val_acc,
        };

        if self.verbose {
            println!(
                "{} {}: train_acc={} | val_acc={} | train_loss={} | val_loss={} | train_cost={} | val_cost={}",
                self.kind.prefix(),
                point.step,
                point.train_acc,
                point.val_acc,
                point.train_loss,
                point.val_loss,
                point.train_cost,
                point.val_cost,
            );
        }

        // A closed receiver is not an error; just stop sending.
        if let Some(tx) = self.progress_tx.take() {
            if tx.send(point.clone()).is_ok() {
                self.progress_tx = Some(tx);
            }
        }

        self.points.push(point);
    }

    pub fn val_losses(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.val_loss).collect()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// Persists the recorded points as pretty-printed JSON.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.points)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    /// Loads previously saved history points.
    pub fn load_points(path: &str) -> Result<Vec<HistoryPoint>> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
