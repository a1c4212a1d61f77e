//! Fixed-topology feed-forward network.
//!
//! Layer 0 holds raw inputs. Each layer i in 1..L owns one weight matrix
//! (width = previous layer size, height = this layer size) and one bias
//! column (1 × this layer size — the same shape as an activation column,
//! so the fused multiply-accumulate kernel can seed from it directly).
//! Activation columns flow through the layers as 1-wide matrices.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::{multiply_accumulate, Matrix};
use crate::rng::SmoothedRng;

use super::activation::softsign_in_place;

/// Feed-forward network with softsign activation.
///
/// Exclusively owns its weight and bias matrices: created once with a
/// topology and randomized weights, mutated in place by training calls,
/// released by `Drop`.
#[derive(Debug)]
pub struct Network {
    /// Layer sizes, including the input layer at index 0.
    pub(crate) sizes: Vec<usize>,

    /// weights[i] connects layer i to layer i + 1.
    pub(crate) weights: Vec<Matrix>,

    /// biases[i] belongs to layer i + 1.
    pub(crate) biases: Vec<Matrix>,

    /// Gradient-descent step size, fixed at construction.
    pub(crate) step_size: f32,
}

impl Network {
    /// Build a network with the given layer sizes, drawing every weight and
    /// bias element from `rng`.
    ///
    /// Requires at least two layers and nonzero sizes. The draw order is
    /// fixed (per layer: weights column-by-column, then the bias top-down),
    /// so a given seed always produces the same network.
    pub fn new(layer_sizes: &[usize], step_size: f32, rng: &mut SmoothedRng) -> Self {
        assert!(layer_sizes.len() >= 2, "a network needs at least two layers");
        assert!(
            layer_sizes.iter().all(|&s| s > 0),
            "layer sizes must be nonzero"
        );

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);

        for i in 1..layer_sizes.len() {
            let (w, h) = (layer_sizes[i - 1], layer_sizes[i]);

            let mut weight = Matrix::new(w, h);
            for x in 0..w {
                for y in 0..h {
                    weight.set(x, y, rng.next());
                }
            }

            let mut bias = Matrix::new(1, h);
            for y in 0..h {
                bias.set(0, y, rng.next());
            }

            weights.push(weight);
            biases.push(bias);
        }

        tracing::debug!(
            layers = layer_sizes.len(),
            step_size,
            "feed-forward network created"
        );

        Self {
            sizes: layer_sizes.to_vec(),
            weights,
            biases,
            step_size,
        }
    }

    /// Number of layers, counting the input layer.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.sizes.len()
    }

    /// Layer sizes, input layer first.
    #[inline]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Step size fixed at construction.
    #[inline]
    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    /// Weight matrix feeding layer `layer` (1 ≤ layer < layer_count).
    pub fn weight(&self, layer: usize) -> &Matrix {
        &self.weights[layer - 1]
    }

    /// Bias column of layer `layer` (1 ≤ layer < layer_count).
    pub fn bias(&self, layer: usize) -> &Matrix {
        &self.biases[layer - 1]
    }

    /// Replace the weight matrix feeding layer `layer` with a deep copy of
    /// `src`. Fails if `src` is not shaped previous-size × this-size.
    pub fn set_weight(&mut self, layer: usize, src: &Matrix) -> Result<()> {
        let want = (self.sizes[layer - 1], self.sizes[layer]);
        if (src.width(), src.height()) != want {
            return Err(Error::ShapeMismatch { op: "set_weight" });
        }
        self.weights[layer - 1] = src.duplicate();
        Ok(())
    }

    /// Replace the bias column of layer `layer` with a deep copy of `src`.
    pub fn set_bias(&mut self, layer: usize, src: &Matrix) -> Result<()> {
        if (src.width(), src.height()) != (1, self.sizes[layer]) {
            return Err(Error::ShapeMismatch { op: "set_bias" });
        }
        self.biases[layer - 1] = src.duplicate();
        Ok(())
    }

    /// Re-draw layer `layer`'s weights and bias from `rng`, leaving every
    /// other layer untouched. Used for structural mutation, e.g. by an
    /// evolutionary caller.
    pub fn randomize_layer(&mut self, layer: usize, rng: &mut SmoothedRng) {
        let weight = &mut self.weights[layer - 1];
        for x in 0..weight.width() {
            for y in 0..weight.height() {
                weight.set(x, y, rng.next());
            }
        }
        let bias = &mut self.biases[layer - 1];
        for y in 0..bias.height() {
            bias.set(0, y, rng.next());
        }
    }

    /// Forward pass: load `input` into layer 0, then for each layer compute
    /// zᵢ = Wᵢ·aᵢ₋₁ + bᵢ in one fused pass and aᵢ = softsign(zᵢ).
    ///
    /// Returns the final layer's activations. Fails without producing any
    /// output if `input` does not match layer 0 or an intermediate product
    /// reports a shape mismatch (misconfigured topology).
    pub fn activate(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.sizes[0] {
            return Err(Error::TopologyMismatch { layer: 0 });
        }

        let mut a = Matrix::new(1, self.sizes[0]);
        a.set_column(0, input);

        for i in 1..self.sizes.len() {
            let mut z = Matrix::new(1, self.sizes[i]);
            multiply_accumulate(&self.weights[i - 1], &a, &self.biases[i - 1], &mut z)
                .map_err(|_| Error::TopologyMismatch { layer: i })?;
            softsign_in_place(&mut z);
            a = z;
        }

        Ok(a.column_to_vec(0))
    }

    /// Capture the logical contents of every weight and bias matrix.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            layer_sizes: self.sizes.clone(),
            step_size: self.step_size,
            weights: self.weights.iter().map(logical_contents).collect(),
            biases: self.biases.iter().map(logical_contents).collect(),
        }
    }

    /// Rebuild a network from a checkpoint. Activation behavior of the
    /// restored network is bit-identical to the captured one.
    ///
    /// The checkpoint must be internally consistent (it is if it came from
    /// [`Network::checkpoint`] and survived the caller's encoding intact).
    pub fn restore(c: &Checkpoint) -> Self {
        assert!(c.layer_sizes.len() >= 2, "checkpoint has no layers");
        assert_eq!(c.weights.len(), c.layer_sizes.len() - 1);
        assert_eq!(c.biases.len(), c.layer_sizes.len() - 1);

        let mut weights = Vec::with_capacity(c.weights.len());
        let mut biases = Vec::with_capacity(c.biases.len());

        for i in 1..c.layer_sizes.len() {
            let (w, h) = (c.layer_sizes[i - 1], c.layer_sizes[i]);
            weights.push(matrix_from_logical(w, h, &c.weights[i - 1]));
            biases.push(matrix_from_logical(1, h, &c.biases[i - 1]));
        }

        Self {
            sizes: c.layer_sizes.clone(),
            weights,
            biases,
            step_size: c.step_size,
        }
    }
}

/// Logical W×H contents of every layer matrix, in column-major
/// (x-outer, y-inner) order. Padding never leaves the engine; a caller can
/// encode this with any serde format and get a deterministic reload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub layer_sizes: Vec<usize>,
    pub step_size: f32,
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<Vec<f32>>,
}

fn logical_contents(m: &Matrix) -> Vec<f32> {
    let mut out = Vec::with_capacity(m.width() * m.height());
    for x in 0..m.width() {
        for y in 0..m.height() {
            out.push(m.get(x, y));
        }
    }
    out
}

fn matrix_from_logical(w: usize, h: usize, values: &[f32]) -> Matrix {
    assert_eq!(values.len(), w * h, "checkpoint matrix length mismatch");
    let mut m = Matrix::new(w, h);
    for x in 0..w {
        for y in 0..h {
            m.set(x, y, values[x * h + y]);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_network() {
        let mut r1 = SmoothedRng::new(5);
        let mut r2 = SmoothedRng::new(5);
        let a = Network::new(&[3, 4, 2], 0.1, &mut r1);
        let b = Network::new(&[3, 4, 2], 0.1, &mut r2);
        assert_eq!(a.checkpoint(), b.checkpoint());
    }

    #[test]
    fn test_activate_is_bounded() {
        let mut rng = SmoothedRng::new(3);
        let net = Network::new(&[4, 6, 3], 0.1, &mut rng);
        let out = net.activate(&[0.5, -0.25, 10.0, -10.0]).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.abs() < 1.0));
    }

    #[test]
    fn test_activate_rejects_wrong_input_length() {
        let mut rng = SmoothedRng::new(3);
        let net = Network::new(&[4, 2], 0.1, &mut rng);
        let err = net.activate(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, Error::TopologyMismatch { layer: 0 });
    }

    #[test]
    fn test_scalar_chain_topology() {
        // 1-wide layers exercise the kernels' 1×1 specialization
        let mut rng = SmoothedRng::new(8);
        let net = Network::new(&[1, 1, 1], 0.1, &mut rng);
        let out = net.activate(&[0.75]).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].abs() < 1.0);
    }

    #[test]
    fn test_set_weight_validates_shape() {
        let mut rng = SmoothedRng::new(1);
        let mut net = Network::new(&[2, 3], 0.1, &mut rng);

        let wrong = Matrix::new(3, 2);
        assert_eq!(
            net.set_weight(1, &wrong),
            Err(Error::ShapeMismatch { op: "set_weight" })
        );

        let right = Matrix::new(2, 3);
        assert!(net.set_weight(1, &right).is_ok());
        assert_eq!(net.weight(1).get(0, 0), 0.0);
    }

    #[test]
    fn test_checkpoint_round_trip_preserves_activation() {
        let mut rng = SmoothedRng::new(21);
        let net = Network::new(&[3, 5, 5, 2], 0.3, &mut rng);
        let restored = Network::restore(&net.checkpoint());

        let input = [0.1, -0.7, 0.4];
        let a = net.activate(&input).unwrap();
        let b = restored.activate(&input).unwrap();
        assert_eq!(a, b);
        assert_eq!(restored.step_size(), 0.3);
    }

    #[test]
    fn test_randomize_layer_touches_only_that_layer() {
        let mut rng = SmoothedRng::new(13);
        let mut net = Network::new(&[2, 3, 2], 0.1, &mut rng);
        let before = net.checkpoint();

        net.randomize_layer(1, &mut rng);
        let after = net.checkpoint();

        assert_ne!(before.weights[0], after.weights[0]);
        assert_ne!(before.biases[0], after.biases[0]);
        assert_eq!(before.weights[1], after.weights[1]);
        assert_eq!(before.biases[1], after.biases[1]);
    }

    #[test]
    fn test_weight_bias_introspection() {
        let mut rng = SmoothedRng::new(2);
        let net = Network::new(&[2, 4, 1], 0.1, &mut rng);
        assert_eq!(net.layer_count(), 3);
        assert_eq!(net.layer_sizes(), &[2, 4, 1]);
        assert_eq!((net.weight(1).width(), net.weight(1).height()), (2, 4));
        assert_eq!((net.weight(2).width(), net.weight(2).height()), (4, 1));
        assert_eq!((net.bias(1).width(), net.bias(1).height()), (1, 4));
    }
}
