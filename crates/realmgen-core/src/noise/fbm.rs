//! Fractional Brownian motion: a weighted sum of lattice-noise octaves.
//!
//! Octave `i` has frequency `lacunarity^i` and amplitude `persistence^i`.
//! Each octave draws a fresh gradient lattice of
//! `floor(extent * freq / scale) + 1` points per axis.
use crate::config::GenerationSettings;
use crate::field::ScalarField;
use crate::rng::WorldRng;

use super::lattice::GradientLattice;

pub struct Fbm {
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub scale: f64,
}

impl Fbm {
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self {
            octaves: settings.octaves,
            persistence: settings.persistence,
            lacunarity: settings.lacunarity,
            scale: settings.scale,
        }
    }

    /// Lattice points along an axis of `extent` cells at frequency `freq`.
    fn axis_points(&self, extent: usize, freq: f64) -> f64 {
        let n = (extent as f64 * freq / self.scale).floor();
        if n.is_nan() {
            2.0
        } else {
            (n + 1.0).max(2.0)
        }
    }

    fn lattice_extent(&self, extent: usize, freq: f64) -> usize {
        self.axis_points(extent, freq) as usize
    }

    /// Gradient count of the largest octave lattice over a `width x height`
    /// grid. Infinite when an axis overflows.
    pub fn peak_lattice_points(&self, width: usize, height: usize) -> f64 {
        let mut frequency = 1.0f64;
        let mut peak = 0.0f64;
        for _ in 0..self.octaves {
            peak = peak.max(self.axis_points(height, frequency) * self.axis_points(width, frequency));
            frequency *= self.lacunarity;
        }
        peak
    }

    /// Synthesize a `width x height` field, normalised by the total amplitude
    /// so values stay roughly in `[-1, 1]`.
    pub fn generate(&self, width: usize, height: usize, rng: &mut WorldRng) -> ScalarField {
        let mut out = ScalarField::new(width, height, 0.0);
        let mut amplitude = 1.0f64;
        let mut frequency = 1.0f64;
        let mut total = 0.0f64;

        for _ in 0..self.octaves {
            let lattice = GradientLattice::random(
                self.lattice_extent(height, frequency),
                self.lattice_extent(width, frequency),
                rng,
            );
            // Map the grid linearly onto [0, n-1] along each axis.
            let ys = linspace(lattice.rows, height);
            let xs = linspace(lattice.cols, width);
            for (r, &y) in ys.iter().enumerate() {
                for (c, &x) in xs.iter().enumerate() {
                    let i = r * width + c;
                    out.data[i] += amplitude * lattice.sample(y, x);
                }
            }
            total += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if total > 0.0 {
            for v in &mut out.data {
                *v /= total;
            }
        }
        out
    }
}

/// `count` evenly spaced coordinates covering `[0, points - 1]`.
fn linspace(points: usize, count: usize) -> Vec<f64> {
    let end = (points - 1) as f64;
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..count).map(|i| end * i as f64 / (count - 1) as f64).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fbm() -> Fbm {
        Fbm { octaves: 4, persistence: 0.5, lacunarity: 2.0, scale: 16.0 }
    }

    #[test]
    fn produces_non_constant_output_in_range() {
        let field = fbm().generate(64, 64, &mut WorldRng::new(42));
        assert!(field.max_value() - field.min_value() > 0.01);
        assert!(field.data.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn same_seed_same_field() {
        let a = fbm().generate(40, 30, &mut WorldRng::new(5));
        let b = fbm().generate(40, 30, &mut WorldRng::new(5));
        assert_eq!(a, b);
        let c = fbm().generate(40, 30, &mut WorldRng::new(6));
        assert_ne!(a, c);
    }

    #[test]
    fn lattice_extent_has_floor_of_two() {
        let f = Fbm { scale: 1000.0, ..fbm() };
        assert_eq!(f.lattice_extent(64, 1.0), 2);
        assert_eq!(fbm().lattice_extent(64, 1.0), 5);
        assert_eq!(fbm().lattice_extent(64, 2.0), 9);
    }

    #[test]
    fn linspace_covers_endpoints() {
        let xs = linspace(5, 9);
        assert_eq!(xs.first(), Some(&0.0));
        assert_eq!(xs.last(), Some(&4.0));
        assert_eq!(xs[4], 2.0);
    }
}
