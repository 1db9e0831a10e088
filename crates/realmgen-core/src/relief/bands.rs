//! Elevation band redistribution.
//!
//! Noise is mapped to `[0, 1]`, bent by a power curve and then each band is
//! stretched about its lower edge so band boundaries stay put.
use crate::field::ScalarField;

pub const HILL_LEVEL: f64 = 0.35;
pub const MOUNTAIN_LEVEL: f64 = 0.65;

const LOWLAND_GAIN: f64 = 0.9;
const HILL_GAIN: f64 = 1.1;
const MOUNTAIN_GAIN: f64 = 1.2;

/// Rescale one normalised height within its band.
#[inline]
pub fn band(h: f64) -> f64 {
    let out = if h < HILL_LEVEL {
        h * LOWLAND_GAIN
    } else if h < MOUNTAIN_LEVEL {
        HILL_LEVEL + (h - HILL_LEVEL) * HILL_GAIN
    } else {
        MOUNTAIN_LEVEL + (h - MOUNTAIN_LEVEL) * MOUNTAIN_GAIN
    };
    out.clamp(0.0, 1.0)
}

pub fn redistribute(noise: &ScalarField, height_power: f64) -> ScalarField {
    let data = noise
        .data
        .iter()
        .map(|&n| band(((n + 1.0) * 0.5).clamp(0.0, 1.0).powf(height_power)))
        .collect();
    ScalarField { data, width: noise.width, height: noise.height }
}
