//! Fractal gradient-noise synthesis for the base heightmap.
pub mod fbm;
pub mod lattice;

use crate::config::GenerationSettings;
use crate::field::ScalarField;
use crate::rng::WorldRng;
use fbm::Fbm;

/// Raw fractal noise for the world grid, roughly in `[-1, 1]`.
///
/// The stream is rewound to its seed first, so calling this twice with the
/// same settings yields identical fields no matter what was drawn before.
pub fn heightmap(settings: &GenerationSettings, rng: &mut WorldRng) -> ScalarField {
    rng.reset();
    let fbm = Fbm::from_settings(settings);
    log::debug!(
        "heightmap: {}x{}, {} octaves, scale {}",
        settings.width,
        settings.height,
        fbm.octaves,
        fbm.scale
    );
    fbm.generate(settings.width, settings.height, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GenerationSettings {
        GenerationSettings { width: 48, height: 32, scale: 16.0, ..Default::default() }
    }

    #[test]
    fn heightmap_rewinds_the_stream() {
        let settings = small();
        let mut rng = WorldRng::new(9);
        let a = heightmap(&settings, &mut rng);
        for _ in 0..17 {
            rng.unit();
        }
        let b = heightmap(&settings, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn heightmap_matches_grid_dimensions() {
        let settings = small();
        let field = heightmap(&settings, &mut WorldRng::new(1));
        assert_eq!(field.width, 48);
        assert_eq!(field.height, 32);
        assert_eq!(field.len(), 48 * 32);
    }
}
