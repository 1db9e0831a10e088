//! Small-scale Perlin perturbation shared by both climate fields.

use noise::{NoiseFn, Perlin};

use crate::rng::WorldRng;

/// Cells per noise period.
const PERIOD: f64 = 16.0;

pub struct LocalNoise {
    perlin: Perlin,
}

impl LocalNoise {
    /// Seed a fresh generator from the next draw of `rng`.
    pub fn from_rng(rng: &mut WorldRng) -> Self {
        Self { perlin: Perlin::new(rng.next_u32()) }
    }

    /// Noise in roughly `[-1, 1]` at grid cell `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.perlin.get([col as f64 / PERIOD, row as f64 / PERIOD])
    }
}
