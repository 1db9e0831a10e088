//! Turning raw noise into a banded, de-spiked elevation field in `[0, 1]`.
pub mod bands;
pub mod smoothing;

use crate::config::GenerationSettings;
use crate::field::ScalarField;

/// Redistribute raw noise into elevation bands, then apply slope-adaptive
/// smoothing.
pub fn shape(noise: &ScalarField, settings: &GenerationSettings) -> ScalarField {
    let banded = bands::redistribute(noise, settings.height_power);
    log::debug!(
        "relief: banded range [{:.3}, {:.3}]",
        banded.min_value(),
        banded.max_value()
    );
    smoothing::smooth(&banded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise;
    use crate::rng::WorldRng;

    #[test]
    fn shaped_noise_is_normalised() {
        let settings =
            GenerationSettings { width: 40, height: 40, scale: 12.0, ..Default::default() };
        let raw = noise::heightmap(&settings, &mut WorldRng::new(77));
        let elevation = shape(&raw, &settings);
        assert!(elevation.data.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(elevation.max_value() > elevation.min_value());
    }
}
