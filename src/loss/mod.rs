pub mod cross_entropy;
pub mod hinge;
pub mod loss_type;

pub use cross_entropy::CrossEntropyLoss;
pub use hinge::HingeLoss;
pub use loss_type::LossType;
