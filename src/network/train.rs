//! Single-example gradient-descent training.
//!
//! One call runs a forward pass that caches every pre- and post-activation
//! column, computes the output delta against the expected values, and
//! backpropagates through transposed weight matrices, updating each layer's
//! weights and bias in place:
//!
//! ```text
//! δ_top = (a_top − expected) ⊙ softsign′(z_top)
//! δ_i   = (W_{i+1}ᵗ · δ_{i+1}) ⊙ softsign′(z_i)
//! W_i  ← W_i − η · (δ_i · a_{i-1}ᵗ)      b_i ← b_i − η · δ_i
//! ```
//!
//! Every transient column and transposed copy is a scope-owned local, so
//! all of them are released on every exit path, including the error path.

use crate::config::LANE;
use crate::error::{Error, Result};
use crate::matrix::{hadamard, multiply, multiply_accumulate, transpose, Matrix};

use super::activation::{softsign_in_place, softsign_prime_into};
use super::feedforward::Network;

impl Network {
    /// One stochastic-gradient-descent step on a single (input, expected)
    /// pair. Mutates weights and biases in place; update order between
    /// layers is irrelevant because every update reads only values captured
    /// during the forward and backward passes.
    pub fn train(&mut self, input: &[f32], expected: &[f32]) -> Result<()> {
        let top = self.sizes.len() - 1;
        if input.len() != self.sizes[0] {
            return Err(Error::TopologyMismatch { layer: 0 });
        }
        if expected.len() != self.sizes[top] {
            return Err(Error::TopologyMismatch { layer: top });
        }

        // Forward pass, caching z_i and a_i per layer.
        let mut activations: Vec<Matrix> = Vec::with_capacity(top + 1);
        let mut pre: Vec<Matrix> = Vec::with_capacity(top);

        let mut a0 = Matrix::new(1, self.sizes[0]);
        a0.set_column(0, input);
        activations.push(a0);

        for i in 1..=top {
            let mut z = Matrix::new(1, self.sizes[i]);
            multiply_accumulate(&self.weights[i - 1], &activations[i - 1], &self.biases[i - 1], &mut z)
                .map_err(|_| Error::TopologyMismatch { layer: i })?;
            let mut a = z.duplicate();
            softsign_in_place(&mut a);
            pre.push(z);
            activations.push(a);
        }

        // Output delta: (a_top − expected) ⊙ softsign′(z_top).
        let mut err = Matrix::new(1, self.sizes[top]);
        let mut sse = 0.0f32;
        for (y, &want) in expected.iter().enumerate() {
            let e = activations[top].get(0, y) - want;
            err.set(0, y, e);
            sse += e * e;
        }
        let mut prime = Matrix::new(1, self.sizes[top]);
        softsign_prime_into(&pre[top - 1], &mut prime);
        let mut delta = Matrix::new(1, self.sizes[top]);
        hadamard(&err, &prime, &mut delta)
            .map_err(|_| Error::TopologyMismatch { layer: top })?;

        // Walk the layers top-down: derive the next delta from the
        // not-yet-updated weights, then apply this layer's update.
        for i in (1..=top).rev() {
            let next_delta = if i > 1 {
                let w = &self.weights[i - 1];
                let mut wt = Matrix::new(w.height(), w.width());
                transpose(w, &mut wt).map_err(|_| Error::TopologyMismatch { layer: i })?;

                let mut back = Matrix::new(1, self.sizes[i - 1]);
                multiply(&wt, &delta, &mut back)
                    .map_err(|_| Error::TopologyMismatch { layer: i })?;

                let mut prime = Matrix::new(1, self.sizes[i - 1]);
                softsign_prime_into(&pre[i - 2], &mut prime);

                let mut d = Matrix::new(1, self.sizes[i - 1]);
                hadamard(&back, &prime, &mut d)
                    .map_err(|_| Error::TopologyMismatch { layer: i })?;
                Some(d)
            } else {
                None
            };

            // ΔW_i = δ_i · a_{i-1}ᵗ
            let mut at = Matrix::new(self.sizes[i - 1], 1);
            transpose(&activations[i - 1], &mut at)
                .map_err(|_| Error::TopologyMismatch { layer: i })?;
            let mut grad = Matrix::new(self.sizes[i - 1], self.sizes[i]);
            multiply(&delta, &at, &mut grad)
                .map_err(|_| Error::TopologyMismatch { layer: i })?;

            apply_step(&mut self.weights[i - 1], &grad, self.step_size);
            apply_step(&mut self.biases[i - 1], &delta, self.step_size);

            if let Some(d) = next_delta {
                delta = d;
            }
        }

        tracing::trace!(squared_error = sse, "sgd step applied");
        Ok(())
    }
}

/// dst ← dst − η · grad over whole lanes. Gradient padding is zero, so the
/// destination's padding survives untouched.
fn apply_step(dst: &mut Matrix, grad: &Matrix, eta: f32) {
    debug_assert_eq!((dst.width(), dst.height()), (grad.width(), grad.height()));
    for (d, g) in dst.blocks_mut().iter_mut().zip(grad.blocks()) {
        for l in 0..LANE {
            d.0[l] -= eta * g.0[l];
        }
    }
}
