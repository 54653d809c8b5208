use serde::{Serialize, Deserialize};

/// Selects the classification loss at network construction time.
///
/// - `CrossEntropy` — categorical cross-entropy over a softmax head. The
///   output delta is the combined softmax+CE gradient `P - Y`.
/// - `Hinge`        — multi-class SVM hinge loss over raw scores (identity
///   head); no softmax is applied to the final layer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    CrossEntropy,
    Hinge,
}
