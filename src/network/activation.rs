//! Softsign activation — `x / (1 + |x|)`.
//!
//! Bounded in (−1, 1), monotonic, odd, and cheap: one reciprocal, no
//! exponential. Its derivative `1 / (1 + |x|)²` reuses the same reciprocal
//! term, which is what makes the backward pass as light as the forward one.

use crate::config::LANE;
use crate::matrix::Matrix;

/// softsign(x) = x / (1 + |x|).
#[inline]
pub fn softsign(x: f32) -> f32 {
    x / (1.0 + x.abs())
}

/// softsign′(x) = 1 / (1 + |x|)².
#[inline]
pub fn softsign_prime(x: f32) -> f32 {
    let d = 1.0 + x.abs();
    1.0 / (d * d)
}

/// Apply softsign over the whole padded buffer in place.
/// softsign(0) = 0, so padding rows stay zero.
pub(crate) fn softsign_in_place(m: &mut Matrix) {
    for block in m.blocks_mut() {
        for l in 0..LANE {
            block.0[l] = softsign(block.0[l]);
        }
    }
}

/// out = softsign′(z), elementwise. Shapes must already match.
///
/// softsign′(0) = 1 dirties the padding during the full-lane sweep, so the
/// padding is re-zeroed before returning.
pub(crate) fn softsign_prime_into(z: &Matrix, out: &mut Matrix) {
    debug_assert_eq!((z.width(), z.height()), (out.width(), out.height()));
    for (d, s) in out.blocks_mut().iter_mut().zip(z.blocks()) {
        for l in 0..LANE {
            d.0[l] = softsign_prime(s.0[l]);
        }
    }
    out.rezero_padding();
}
