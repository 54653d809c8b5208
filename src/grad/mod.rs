pub mod check;

pub use check::{compare_gradients, numerical_gradients, LayerErrors};
