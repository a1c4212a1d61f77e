//! Dense-matrix engine — padded, vector-aligned storage and the
//! lane-friendly arithmetic kernels built on it.
//!
//! Layout: element (x, y) of a W×H matrix lives at `buffer[x · S + y]`,
//! where the stride S is the height rounded up to the vector lane width.
//! Padding rows (y ≥ H) are kept zero by every kernel so whole-lane loads
//! and stores never see stale values.

pub mod dense;
pub mod kernels;

pub use dense::Matrix;
pub use kernels::{
    hadamard, multiply, multiply_accumulate, subtract_scalar, subtract_scalar_in_place, transpose,
};
