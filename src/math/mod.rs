pub mod matrix;
pub mod kernels;
