pub mod config;
pub mod cyclic;
pub mod dataset;
pub mod history;
pub mod mini_batch;
pub mod range_test;

pub use config::{Annealing, CyclicParams, GdParams, RangeTestParams};
pub use cyclic::{cyclic_learning, triangular_eta};
pub use dataset::DataSplit;
pub use history::{History, HistoryPoint, StepKind};
pub use mini_batch::{early_stopping, mini_batch_gd};
pub use range_test::lr_range_test;
