//! Precipitation: proximity to water dominates, modulated by a monsoon band
//! pattern, orographic lift, a rain shadow downwind of steep terrain and
//! local noise.
use std::f64::consts::TAU;

use crate::field::{cells, ScalarField};
use crate::rng::WorldRng;

use super::distance::distance_to;
use super::local_noise::LocalNoise;

/// How far upwind (to the west) the rain shadow reads the slope.
pub const RAIN_SHADOW_SHIFT: usize = 3;

const PROXIMITY_WEIGHT: f64 = 0.45;
const MONSOON_WEIGHT: f64 = 0.15;
const OROGRAPHIC_WEIGHT: f64 = 0.2;
const SHADOW_WEIGHT: f64 = 0.1;
const LOCAL_WEIGHT: f64 = 0.1;
const CONTRAST_EXPONENT: f64 = 0.8;

/// `1 - d / max(d)` over the water mask; zero everywhere without water.
pub fn water_proximity(elevation: &ScalarField, water_level: f64) -> Vec<f64> {
    let mask: Vec<bool> = elevation.data.iter().map(|&e| e < water_level).collect();
    match distance_to(&mask, elevation.width, elevation.height) {
        None => vec![0.0; mask.len()],
        Some(distance) => {
            let max = distance.iter().cloned().fold(0.0, f64::max);
            if max > 0.0 {
                distance.into_iter().map(|d| 1.0 - d / max).collect()
            } else {
                vec![1.0; mask.len()]
            }
        }
    }
}

/// Slope magnitude `|d/drow| + |d/dcol|` normalised to a maximum of 1.
pub fn orographic(elevation: &ScalarField) -> Vec<f64> {
    let (gy, gx) = elevation.gradient();
    let raw: Vec<f64> = gy.iter().zip(&gx).map(|(y, x)| y.abs() + x.abs()).collect();
    let max = raw.iter().cloned().fold(0.0, f64::max);
    if max > 0.0 {
        raw.into_iter().map(|v| v / max).collect()
    } else {
        raw
    }
}

pub fn generate(elevation: &ScalarField, water_level: f64, rng: &mut WorldRng) -> ScalarField {
    let (width, height) = (elevation.width, elevation.height);
    let monsoon_phase: f64 = rng.range(0.0..TAU);
    let local = LocalNoise::from_rng(rng);

    let proximity = water_proximity(elevation, water_level);
    let oro = orographic(elevation);
    let (w, h) = (width as f64, height as f64);

    let data = cells(width, height, |r, c| {
        let i = r * width + c;
        let monsoon = 0.5
            + 0.5 * (TAU * 2.0 * c as f64 / w + monsoon_phase).sin() * (TAU * r as f64 / h).cos();
        // Wind blows west to east; the western edge reads its own column.
        let upwind = r * width + c.saturating_sub(RAIN_SHADOW_SHIFT);
        let shadow = 1.0 - oro[upwind];
        let p = PROXIMITY_WEIGHT * proximity[i]
            + MONSOON_WEIGHT * monsoon
            + OROGRAPHIC_WEIGHT * oro[i]
            + SHADOW_WEIGHT * shadow
            + LOCAL_WEIGHT * local.at(r, c);
        p.max(0.0).powf(CONTRAST_EXPONENT).powf(CONTRAST_EXPONENT).clamp(0.0, 1.0)
    });
    ScalarField { data, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn proximity_is_one_on_water_and_zero_farthest_away() {
        let elevation = ScalarField::from_fn(10, 4, |_, c| if c == 0 { 0.1 } else { 0.8 });
        let prox = water_proximity(&elevation, 0.4);
        assert_eq!(prox[0], 1.0);
        assert_abs_diff_eq!(prox[9], 0.0, epsilon = 1e-12);
        assert!(prox[3] > prox[6]);
    }

    #[test]
    fn no_water_means_no_proximity() {
        let elevation = ScalarField::new(6, 6, 0.9);
        assert!(water_proximity(&elevation, 0.4).iter().all(|&p| p == 0.0));
    }

    #[test]
    fn all_water_is_fully_proximate() {
        let elevation = ScalarField::new(5, 5, 0.1);
        assert!(water_proximity(&elevation, 0.4).iter().all(|&p| p == 1.0));
    }

    #[test]
    fn orographic_is_normalised() {
        let elevation = ScalarField::from_fn(8, 8, |r, c| (r * c) as f64 / 49.0);
        let oro = orographic(&elevation);
        let max = oro.iter().cloned().fold(0.0, f64::max);
        assert_abs_diff_eq!(max, 1.0, epsilon = 1e-12);
        assert!(orographic(&ScalarField::new(4, 4, 0.5)).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn coasts_are_wetter_than_interiors() {
        let elevation = ScalarField::from_fn(64, 16, |_, c| if c < 4 { 0.1 } else { 0.6 });
        let p = generate(&elevation, 0.4, &mut WorldRng::new(2));
        let col_mean = |c: usize| (0..16).map(|r| p.get(r, c)).sum::<f64>() / 16.0;
        assert!(col_mean(5) > col_mean(60));
        assert!(p.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
