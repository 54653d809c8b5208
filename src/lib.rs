pub mod error;
pub mod math;
pub mod layers;
pub mod loss;
pub mod network;
pub mod grad;
pub mod train;
pub mod ensemble;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use layers::dense::Layer;
pub use loss::loss_type::LossType;
pub use network::network::Network;
pub use grad::check::{compare_gradients, numerical_gradients, LayerErrors};
pub use train::config::{Annealing, CyclicParams, GdParams, RangeTestParams};
pub use train::cyclic::{cyclic_learning, triangular_eta};
pub use train::dataset::DataSplit;
pub use train::history::{History, HistoryPoint, StepKind};
pub use train::mini_batch::{early_stopping, mini_batch_gd};
pub use train::range_test::lr_range_test;
pub use ensemble::{load_snapshots, majority_vote};
