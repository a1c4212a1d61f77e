//! Arithmetic kernels over the padded lane layout.
//!
//! Every kernel validates operand shapes first and returns
//! [`Error::ShapeMismatch`] without touching the destination when they are
//! incompatible. The compute loops then run over whole lane blocks — the
//! padding rows ride along as zeros, which is what keeps them cheap to
//! vectorize.

use crate::config::LANE;
use crate::error::{Error, Result};

use super::dense::{Lane, Matrix};

// ──────────────────────────────────────────────────────────────
// Products
// ──────────────────────────────────────────────────────────────

/// out = a · b.
///
/// Requires `a.width == b.height` and `out` shaped (b.width × a.height).
/// 1×1 operands reduce to a scalar multiply; a single-column `b` is the
/// matrix–vector specialization (one call of the column kernel).
pub fn multiply(a: &Matrix, b: &Matrix, out: &mut Matrix) -> Result<()> {
    check_product_shapes("multiply", a, b, None, out)?;

    if a.width() == 1 && a.height() == 1 && b.width() == 1 {
        out.set(0, 0, a.get(0, 0) * b.get(0, 0));
        return Ok(());
    }

    for q in 0..b.width() {
        accumulate_column(a, b, q, None, out);
    }
    Ok(())
}

/// out = a · b + bias, fused into one pass.
///
/// Shapes as [`multiply`], with `bias` shaped like `out`. The accumulators
/// are seeded from `bias`, so the weighted-sum-plus-bias of a network layer
/// costs a single sweep over `a`.
pub fn multiply_accumulate(a: &Matrix, b: &Matrix, bias: &Matrix, out: &mut Matrix) -> Result<()> {
    check_product_shapes("multiply_accumulate", a, b, Some(bias), out)?;

    if a.width() == 1 && a.height() == 1 && b.width() == 1 {
        out.set(0, 0, a.get(0, 0) * b.get(0, 0) + bias.get(0, 0));
        return Ok(());
    }

    for q in 0..b.width() {
        accumulate_column(a, b, q, Some(bias), out);
    }
    Ok(())
}

/// Compute output column q: out[:, q] = a · b[:, q] (+ bias[:, q]).
///
/// Partial products accumulate into four independent lane accumulators that
/// advance down `a`'s columns four at a time; the accumulators are combined
/// pairwise at the end. That horizontal reduction fixes no summation order,
/// so results may differ from naive left-to-right summation in low bits.
fn accumulate_column(a: &Matrix, b: &Matrix, q: usize, bias: Option<&Matrix>, out: &mut Matrix) {
    let blocks = out.blocks_per_col();
    debug_assert_eq!(blocks, a.blocks_per_col());

    for j in 0..blocks {
        let mut acc0 = match bias {
            Some(d) => d.col(q)[j].0,
            None => [0.0; LANE],
        };
        let mut acc1 = [0.0f32; LANE];
        let mut acc2 = [0.0f32; LANE];
        let mut acc3 = [0.0f32; LANE];

        let mut k = 0;
        while k + 4 <= a.width() {
            let s0 = b.get(q, k);
            let s1 = b.get(q, k + 1);
            let s2 = b.get(q, k + 2);
            let s3 = b.get(q, k + 3);
            let c0 = &a.col(k)[j].0;
            let c1 = &a.col(k + 1)[j].0;
            let c2 = &a.col(k + 2)[j].0;
            let c3 = &a.col(k + 3)[j].0;
            for l in 0..LANE {
                acc0[l] += c0[l] * s0;
                acc1[l] += c1[l] * s1;
                acc2[l] += c2[l] * s2;
                acc3[l] += c3[l] * s3;
            }
            k += 4;
        }
        while k < a.width() {
            let s = b.get(q, k);
            let c = &a.col(k)[j].0;
            for l in 0..LANE {
                acc0[l] += c[l] * s;
            }
            k += 1;
        }

        let dst = &mut out.col_mut(q)[j].0;
        for l in 0..LANE {
            dst[l] = (acc0[l] + acc1[l]) + (acc2[l] + acc3[l]);
        }
    }
}

fn check_product_shapes(
    op: &'static str,
    a: &Matrix,
    b: &Matrix,
    bias: Option<&Matrix>,
    out: &Matrix,
) -> Result<()> {
    if a.width() != b.height() {
        return Err(Error::ShapeMismatch { op });
    }
    if out.width() != b.width() || out.height() != a.height() {
        return Err(Error::ShapeMismatch { op });
    }
    if let Some(d) = bias {
        if d.width() != out.width() || d.height() != out.height() {
            return Err(Error::ShapeMismatch { op });
        }
    }
    Ok(())
}

// ──────────────────────────────────────────────────────────────
// Elementwise kernels
// ──────────────────────────────────────────────────────────────

/// out = aᵗ. Requires `out.height == a.width` and `out.width == a.height`.
/// Pure permutation of the logical region.
pub fn transpose(a: &Matrix, out: &mut Matrix) -> Result<()> {
    if out.height() != a.width() || out.width() != a.height() {
        return Err(Error::ShapeMismatch { op: "transpose" });
    }

    for x in 0..a.width() {
        for y in 0..a.height() {
            out.set(y, x, a.get(x, y));
        }
    }
    Ok(())
}

/// out = a − s, elementwise. Shapes must match.
///
/// The sweep covers whole padded lanes and then re-zeroes the padding rows,
/// which a plain full-buffer subtract would leave at −s.
pub fn subtract_scalar(a: &Matrix, s: f32, out: &mut Matrix) -> Result<()> {
    if out.width() != a.width() || out.height() != a.height() {
        return Err(Error::ShapeMismatch { op: "subtract_scalar" });
    }

    sub_blocks(a.blocks(), s, out.blocks_mut());
    out.rezero_padding();
    Ok(())
}

/// m = m − s, elementwise in place.
pub fn subtract_scalar_in_place(m: &mut Matrix, s: f32) {
    for block in m.blocks_mut() {
        for l in 0..LANE {
            block.0[l] -= s;
        }
    }
    m.rezero_padding();
}

fn sub_blocks(src: &[Lane], s: f32, dst: &mut [Lane]) {
    for (d, a) in dst.iter_mut().zip(src) {
        for l in 0..LANE {
            d.0[l] = a.0[l] - s;
        }
    }
}

/// out = a ⊙ b, the elementwise (Hadamard) product. All three shapes must
/// match exactly. Padding stays zero on its own: 0 · 0 = 0.
pub fn hadamard(a: &Matrix, b: &Matrix, out: &mut Matrix) -> Result<()> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(Error::ShapeMismatch { op: "hadamard" });
    }
    if out.width() != a.width() || out.height() != a.height() {
        return Err(Error::ShapeMismatch { op: "hadamard" });
    }

    let dst = out.blocks_mut();
    for (i, d) in dst.iter_mut().enumerate() {
        let (av, bv) = (&a.blocks()[i].0, &b.blocks()[i].0);
        for l in 0..LANE {
            d.0[l] = av[l] * bv[l];
        }
    }
    Ok(())
}
