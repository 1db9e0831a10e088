//! Climate synthesis: temperature and precipitation derived from the eroded
//! elevation field.
//!
//! Stream order: four temperature phases, the temperature noise seed, the
//! monsoon phase, then the precipitation noise seed.

pub mod distance;
pub mod local_noise;
pub mod precipitation;
pub mod temperature;

use serde::{Deserialize, Serialize};

use crate::field::ScalarField;
use crate::rng::WorldRng;

/// Co-indexed temperature (`[0, 1.2]`) and precipitation (`[0, 1]`) grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateFields {
    pub temperature: ScalarField,
    pub precipitation: ScalarField,
}

impl ClimateFields {
    pub fn width(&self) -> usize {
        self.temperature.width
    }

    pub fn height(&self) -> usize {
        self.temperature.height
    }
}

/// Build both climate fields, drawing every random parameter from `rng`.
pub fn synthesize(elevation: &ScalarField, water_level: f64, rng: &mut WorldRng) -> ClimateFields {
    let temperature = temperature::generate(elevation.width, elevation.height, rng);
    log::debug!(
        "climate: temperature range [{:.3}, {:.3}]",
        temperature.min_value(),
        temperature.max_value()
    );
    let precipitation = precipitation::generate(elevation, water_level, rng);
    log::debug!(
        "climate: precipitation range [{:.3}, {:.3}]",
        precipitation.min_value(),
        precipitation.max_value()
    );
    ClimateFields { temperature, precipitation }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island(n: usize) -> ScalarField {
        let mid = (n - 1) as f64 / 2.0;
        ScalarField::from_fn(n, n, |r, c| {
            let d = ((r as f64 - mid).powi(2) + (c as f64 - mid).powi(2)).sqrt() / mid;
            (1.0 - d).clamp(0.0, 1.0)
        })
    }

    #[test]
    fn fields_stay_in_range() {
        let elevation = island(48);
        let climate = synthesize(&elevation, 0.4, &mut WorldRng::new(12));
        assert!(climate.temperature.data.iter().all(|v| (0.0..=1.2).contains(v)));
        assert!(climate.precipitation.data.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!((climate.width(), climate.height()), (48, 48));
    }

    #[test]
    fn same_stream_state_same_climate() {
        let elevation = island(32);
        let a = synthesize(&elevation, 0.4, &mut WorldRng::new(3));
        let b = synthesize(&elevation, 0.4, &mut WorldRng::new(3));
        assert_eq!(a, b);
    }
}
