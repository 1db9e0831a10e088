//! One octave of Perlin-style gradient noise over a coarse lattice of random
//! unit gradients.
use std::f64::consts::TAU;

use crate::rng::WorldRng;

/// Quintic fade `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub struct GradientLattice {
    pub rows: usize,
    pub cols: usize,
    gradients: Vec<(f64, f64)>,
}

impl GradientLattice {
    /// Draw `rows * cols` gradient angles row-major from `rng`.
    /// Both dimensions are raised to at least 2.
    pub fn random(rows: usize, cols: usize, rng: &mut WorldRng) -> Self {
        let rows = rows.max(2);
        let cols = cols.max(2);
        let gradients = (0..rows * cols)
            .map(|_| {
                let angle: f64 = rng.range(0.0..TAU);
                (angle.cos(), angle.sin())
            })
            .collect();
        Self { rows, cols, gradients }
    }

    #[inline]
    fn gradient(&self, r: usize, c: usize) -> (f64, f64) {
        self.gradients[r * self.cols + c]
    }

    /// Noise at lattice coordinates `y ∈ [0, rows-1]`, `x ∈ [0, cols-1]`.
    /// Zero at every lattice point.
    pub fn sample(&self, y: f64, x: f64) -> f64 {
        let y = y.clamp(0.0, (self.rows - 1) as f64);
        let x = x.clamp(0.0, (self.cols - 1) as f64);
        let r0 = (y.floor() as usize).min(self.rows - 2);
        let c0 = (x.floor() as usize).min(self.cols - 2);
        let fy = y - r0 as f64;
        let fx = x - c0 as f64;

        let dot = |r: usize, c: usize, dy: f64, dx: f64| {
            let (gx, gy) = self.gradient(r, c);
            gx * dx + gy * dy
        };
        let n00 = dot(r0, c0, fy, fx);
        let n01 = dot(r0, c0 + 1, fy, fx - 1.0);
        let n10 = dot(r0 + 1, c0, fy - 1.0, fx);
        let n11 = dot(r0 + 1, c0 + 1, fy - 1.0, fx - 1.0);

        let u = fade(fx);
        let v = fade(fy);
        lerp(lerp(n00, n01, u), lerp(n10, n11, u), v)
    }
}
