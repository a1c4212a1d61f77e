//! Matrix value type — aligned, padded, zero-initialized storage.
//!
//! Storage format:
//!
//! ```text
//! stride S = height rounded up to LANE
//! buffer   = W · S f32, grouped into 32-byte-aligned lane blocks
//! (x, y)   = buffer[x · S + y]        padding: y in H..S, always zero
//! ```
//!
//! A `Matrix` exclusively owns its buffer and is move-only: there is no
//! `Clone`, copying is the explicit [`Matrix::duplicate`]. Dropping frees
//! the buffer.

use crate::config::LANE;

/// One aligned block of `LANE` consecutive f32 elements — the unit every
/// kernel loads and stores.
#[repr(C, align(32))]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Lane(pub(crate) [f32; LANE]);

/// Dense f32 matrix with a padded, lane-aligned column layout.
#[derive(Debug)]
pub struct Matrix {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<Lane>,
}

impl Matrix {
    /// Create a zero-filled W×H matrix.
    ///
    /// The stride is rounded up to the lane width and the buffer is a whole
    /// number of aligned lane blocks, so vector kernels can always process
    /// full lanes. Allocation failure aborts the process.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "matrix dimensions must be positive");

        let stride = (height + LANE - 1) / LANE * LANE;
        let data = vec![Lane([0.0; LANE]); width * stride / LANE];

        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Create the n×n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Logical width (number of columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height (number of rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Padded column stride, always a multiple of the lane width.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Read element (x, y). Requires 0 ≤ x < width and 0 ≤ y < height.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height, "index out of bounds");
        let i = x * self.stride + y;
        self.data[i / LANE].0[i % LANE]
    }

    /// Write element (x, y). Requires 0 ≤ x < width and 0 ≤ y < height.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(x < self.width && y < self.height, "index out of bounds");
        let i = x * self.stride + y;
        self.data[i / LANE].0[i % LANE] = value;
    }

    /// Zero the entire padded buffer, not just the logical region.
    pub fn clear(&mut self) {
        for block in &mut self.data {
            block.0 = [0.0; LANE];
        }
    }

    /// Explicit deep copy of the whole buffer.
    pub fn duplicate(&self) -> Matrix {
        Matrix {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: self.data.clone(),
        }
    }

    /// Overwrite column x from a slice of exactly `height` values.
    pub fn set_column(&mut self, x: usize, values: &[f32]) {
        assert_eq!(values.len(), self.height, "column length mismatch");
        for (y, &v) in values.iter().enumerate() {
            self.set(x, y, v);
        }
    }

    /// Copy the logical rows of column x out to a vector.
    pub fn column_to_vec(&self, x: usize) -> Vec<f32> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }

    /// Lane blocks per column (stride / LANE).
    #[inline]
    pub(crate) fn blocks_per_col(&self) -> usize {
        self.stride / LANE
    }

    /// Lane blocks of column x.
    #[inline]
    pub(crate) fn col(&self, x: usize) -> &[Lane] {
        let b = self.blocks_per_col();
        &self.data[x * b..(x + 1) * b]
    }

    /// Mutable lane blocks of column x.
    #[inline]
    pub(crate) fn col_mut(&mut self, x: usize) -> &mut [Lane] {
        let b = self.blocks_per_col();
        &mut self.data[x * b..(x + 1) * b]
    }

    /// The whole padded buffer as lane blocks.
    #[inline]
    pub(crate) fn blocks(&self) -> &[Lane] {
        &self.data
    }

    /// The whole padded buffer as mutable lane blocks.
    #[inline]
    pub(crate) fn blocks_mut(&mut self) -> &mut [Lane] {
        &mut self.data
    }

    /// Re-zero the padding rows of every column. Kernels that sweep whole
    /// lanes with a non-zero-preserving map call this before returning.
    pub(crate) fn rezero_padding(&mut self) {
        let (height, stride) = (self.height, self.stride);
        if height == stride {
            return;
        }
        for x in 0..self.width {
            for y in height..stride {
                let i = x * stride + y;
                self.data[i / LANE].0[i % LANE] = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LANE_ALIGN;

    #[test]
    fn test_new_is_zeroed_and_padded() {
        let m = Matrix::new(3, 5);
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 5);
        assert_eq!(m.stride(), LANE);
        assert!(m.blocks().iter().all(|b| b.0.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_stride_rounds_up_to_lane() {
        assert_eq!(Matrix::new(1, 1).stride(), LANE);
        assert_eq!(Matrix::new(1, 8).stride(), 8);
        assert_eq!(Matrix::new(1, 9).stride(), 16);
        assert_eq!(Matrix::new(1, 16).stride(), 16);
    }

    #[test]
    fn test_buffer_is_lane_aligned() {
        let m = Matrix::new(4, 11);
        let addr = m.blocks().as_ptr() as usize;
        assert_eq!(addr % LANE_ALIGN, 0);
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut m = Matrix::new(4, 3);
        m.set(0, 0, 1.5);
        m.set(3, 2, -2.25);
        m.set(1, 1, 7.0);
        assert_eq!(m.get(0, 0), 1.5);
        assert_eq!(m.get(3, 2), -2.25);
        assert_eq!(m.get(1, 1), 7.0);
        assert_eq!(m.get(2, 0), 0.0);
    }

    #[test]
    fn test_clear_wipes_whole_buffer() {
        let mut m = Matrix::new(2, 3);
        m.set(1, 2, 9.0);
        m.clear();
        assert!(m.blocks().iter().all(|b| b.0.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut a = Matrix::new(2, 2);
        a.set(0, 0, 3.0);
        let b = a.duplicate();
        a.set(0, 0, -1.0);
        assert_eq!(b.get(0, 0), 3.0);
        assert_eq!(a.get(0, 0), -1.0);
    }

    #[test]
    fn test_identity() {
        let m = Matrix::identity(4);
        for x in 0..4 {
            for y in 0..4 {
                let want = if x == y { 1.0 } else { 0.0 };
                assert_eq!(m.get(x, y), want);
            }
        }
    }

    #[test]
    fn test_column_round_trip() {
        let mut m = Matrix::new(3, 5);
        let values = [0.1, 0.2, 0.3, 0.4, 0.5];
        m.set_column(1, &values);
        assert_eq!(m.column_to_vec(1), values);
        assert_eq!(m.column_to_vec(0), vec![0.0; 5]);
    }

    #[test]
    fn test_rezero_padding() {
        let mut m = Matrix::new(2, 5);
        for block in m.blocks_mut() {
            block.0 = [1.0; LANE];
        }
        m.rezero_padding();
        for x in 0..2 {
            for y in 0..m.stride() {
                let i = x * m.stride() + y;
                let v = m.blocks()[i / LANE].0[i % LANE];
                assert_eq!(v, if y < 5 { 1.0 } else { 0.0 });
            }
        }
    }
}
