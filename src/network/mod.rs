//! Feed-forward network engine — fixed topology, softsign activation,
//! single-example gradient-descent training on the matrix engine.

pub mod activation;
pub mod feedforward;
pub mod train;

pub use feedforward::{Checkpoint, Network};
