//! Erosion passes applied in place to the elevation field.
//!
//! Both passes are skipped when no [`ErosionSettings`] are configured.
pub mod hydraulic;
pub mod thermal;

use crate::config::ErosionSettings;
use crate::field::ScalarField;
use crate::rng::WorldRng;

/// Fixed number of thermal weathering iterations.
pub const THERMAL_ITERATIONS: usize = 5;

/// Run the hydraulic pass followed by the thermal pass.
pub fn erode(elevation: &mut ScalarField, settings: Option<&ErosionSettings>, rng: &mut WorldRng) {
    let Some(settings) = settings else {
        log::debug!("erosion: no settings, skipping");
        return;
    };
    let before = elevation.sum();
    hydraulic::apply(elevation, settings, rng);
    log::debug!(
        "erosion: {} droplets moved net mass {:+.4}",
        settings.droplets,
        elevation.sum() - before
    );
    for _ in 0..THERMAL_ITERATIONS {
        thermal::apply(elevation, settings.min_slope);
    }
    log::debug!("erosion: {THERMAL_ITERATIONS} thermal iterations done");
}
