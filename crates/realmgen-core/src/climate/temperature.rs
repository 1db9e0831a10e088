//! Temperature: a latitude gradient peaking at the vertical centre, perturbed
//! by continental and regional sinusoids and local noise.
use std::f64::consts::TAU;

use crate::field::{cells, ScalarField};
use crate::rng::WorldRng;

use super::local_noise::LocalNoise;

const LATITUDE_EXPONENT: f64 = 0.6;
const CONTINENTAL_WEIGHT: f64 = 0.1;
const REGIONAL_WEIGHT: f64 = 0.05;
const LOCAL_WEIGHT: f64 = 0.05;
pub const MAX_TEMPERATURE: f64 = 1.2;

/// Base temperature for row `r` of `height`: 1 at the equator, 0 at the poles.
#[inline]
pub fn latitude_base(r: usize, height: usize) -> f64 {
    if height < 2 {
        return 1.0;
    }
    let lat = (2.0 * r as f64 / (height - 1) as f64 - 1.0).abs();
    (1.0 - lat).max(0.0).powf(LATITUDE_EXPONENT)
}

pub fn generate(width: usize, height: usize, rng: &mut WorldRng) -> ScalarField {
    let phases: [f64; 4] = std::array::from_fn(|_| rng.range(0.0..TAU));
    let local = LocalNoise::from_rng(rng);
    let (w, h) = (width as f64, height as f64);

    let data = cells(width, height, |r, c| {
        let (x, y) = (c as f64, r as f64);
        let continental = (TAU * 1.5 * x / w + phases[0]).sin() * (TAU * y / h + phases[1]).cos();
        let regional = (TAU * 4.0 * x / w + phases[2]).sin() * (TAU * 3.0 * y / h + phases[3]).sin();
        let t = latitude_base(r, height)
            + CONTINENTAL_WEIGHT * continental
            + REGIONAL_WEIGHT * regional
            + LOCAL_WEIGHT * local.at(r, c);
        t.clamp(0.0, MAX_TEMPERATURE)
    });
    ScalarField { data, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn latitude_peaks_at_centre() {
        assert_abs_diff_eq!(latitude_base(0, 11), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(latitude_base(10, 11), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(latitude_base(5, 11), 1.0, epsilon = 1e-12);
        assert!(latitude_base(3, 11) < latitude_base(4, 11));
    }

    #[test]
    fn equator_is_warmer_than_poles_on_average() {
        let t = generate(64, 65, &mut WorldRng::new(5));
        let row_mean = |r: usize| (0..64).map(|c| t.get(r, c)).sum::<f64>() / 64.0;
        assert!(row_mean(32) > row_mean(0) + 0.5);
        assert!(row_mean(32) > row_mean(64) + 0.5);
    }

    #[test]
    fn values_are_clamped() {
        let t = generate(30, 20, &mut WorldRng::new(99));
        assert!(t.data.iter().all(|v| (0.0..=MAX_TEMPERATURE).contains(v)));
    }
}
