//! Crate error type — shape failures surface as status returns, never
//! panics; allocation failure remains fatal (Rust's abort-on-OOM).

/// Errors produced by the matrix and network engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Operand or destination dimensions are incompatible for a kernel.
    /// The destination is left untouched.
    #[error("{op}: operand dimensions are incompatible")]
    ShapeMismatch {
        /// Kernel that rejected the shapes.
        op: &'static str,
    },

    /// A shape failure surfaced through network activation or training;
    /// the call was abandoned and no outputs were written.
    #[error("network topology broke down at layer {layer}")]
    TopologyMismatch {
        /// Index of the layer whose matrices failed to compose.
        layer: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
