//! # NEURITE
//!
//! Compact numerical primitives for embedding tiny learned models or
//! heuristic optimizers into latency-constrained code, without a
//! heavyweight ML dependency.
//!
//! ## Components
//!
//! 1. **Matrix engine** — dense f32 matrices with a padded, vector-aligned
//!    column layout and lane-friendly kernels (multiply, fused
//!    multiply-accumulate, transpose, scalar subtract, Hadamard product)
//! 2. **Network engine** — fixed-topology feed-forward networks with
//!    softsign activation, forward inference, and single-example
//!    gradient-descent training
//! 3. **Evolutionary engine** — fixed-capacity population search, generic
//!    over a caller-supplied genome type
//! 4. **Smoothed PRNG** — the deterministic ring-filtered generator that
//!    feeds weight initialization and stochastic evolution decisions
//!
//! Everything runs synchronously on the caller's thread; the only
//! parallelism exploited is same-thread vector lanes.

pub mod error;
pub mod evolve;
pub mod matrix;
pub mod network;
pub mod rng;

pub use error::{Error, Result};

/// Crate-wide numeric constants.
pub mod config {
    /// f32 elements processed per hardware vector operation (256-bit lanes).
    pub const LANE: usize = 8;

    /// Byte alignment of every matrix buffer (one full vector register).
    pub const LANE_ALIGN: usize = 32;

    /// LCG increment (Numerical Recipes).
    pub const LCG_INCREMENT: u32 = 1_013_904_223;

    /// LCG multiplier (Numerical Recipes).
    pub const LCG_MULTIPLIER: u32 = 1_664_525;

    /// Modulus applied to raw LCG output before normalization.
    pub const DRAW_MODULUS: u32 = 1024;

    /// Slots in the PRNG smoothing ring.
    pub const RING_LEN: usize = 8;

    /// Reproduction partner search: maximum fitness distance to a parent.
    pub const FITNESS_TOLERANCE: f32 = 0.2;

    /// Culling: a member dies when a draw falls at or below this fraction
    /// of its fitness.
    pub const CULL_FACTOR: f32 = 0.5;
}
