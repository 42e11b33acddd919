//! Layered Noise
//!
//! Weighted sums of OpenSimplex octaves sampled at `(x / size, y / size, z)`.
//! The `z` coordinate picks an independent slice per terrain field.

use noise::{NoiseFn, OpenSimplex};

use super::TerrainError;

/// One frequency layer: feature size in cells and its weight in the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octave {
    pub size: f64,
    pub weight: f64,
}

/// A stack of octaves sampled together.
#[derive(Debug, Clone, Copy)]
pub struct Layers<'a> {
    octaves: &'a [Octave],
    normalize: bool,
}

impl<'a> Layers<'a> {
    /// Sum divided by the total weight, keeping the result in `[-1, 1]`.
    pub const fn normalized(octaves: &'a [Octave]) -> Self {
        Self {
            octaves,
            normalize: true,
        }
    }

    /// Plain weighted sum.
    pub const fn raw(octaves: &'a [Octave]) -> Self {
        Self {
            octaves,
            normalize: false,
        }
    }
}

/// Shorthand for an octave table entry.
pub const fn octave(size: f64, weight: f64) -> Octave {
    Octave { size, weight }
}

/// Seeded noise source shared by every field of one terrain pass.
pub struct NoiseField {
    simplex: OpenSimplex,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: OpenSimplex::new(seed),
        }
    }

    /// Samples the layered noise at `(x, y)` on slice `z`.
    pub fn sample(&self, x: f64, y: f64, z: f64, layers: Layers<'_>) -> Result<f64, TerrainError> {
        let mut value = 0.0;
        let mut total_weight = 0.0;
        for octave in layers.octaves {
            value += octave.weight * self.simplex.get([x / octave.size, y / octave.size, z]);
            total_weight += octave.weight;
        }
        if layers.normalize {
            value /= total_weight;
        }
        if !value.is_finite() {
            return Err(TerrainError::NonFiniteNoise { x, y, z });
        }
        Ok(value)
    }

    /// Single unit-weight octave of the given size.
    pub fn single(&self, x: f64, y: f64, z: f64, size: f64) -> Result<f64, TerrainError> {
        self.sample(x, y, z, Layers::normalized(&[octave(size, 1.0)]))
    }
}
