//! Pipeline orchestrator: runs every generation stage in order.
//!
//! Stage order, which is also the order of draws from the world stream:
//!   1. Noise synthesis (rewinds the stream to the seed)
//!   2. Height redistribution and smoothing
//!   3. Hydraulic then thermal erosion
//!   4. Climate synthesis
//!   5. Biome classification
//!   6. Habitability scoring
//!   7. Settlement placement and naming (on a snapshot of the stream)

use std::time::Instant;

use crate::biome::BiomeGrid;
use crate::climate;
use crate::config::GenerationSettings;
use crate::erosion;
use crate::error::GenerationError;
use crate::names::NameSynthesizer;
use crate::noise;
use crate::relief;
use crate::rng::WorldRng;
use crate::settlement::{habitability, placement};
use crate::world::World;

/// Runs the pipeline with a fixed set of name models.
#[derive(Debug, Clone, Default)]
pub struct WorldGenerator {
    names: NameSynthesizer,
}

impl WorldGenerator {
    /// A generator using the built-in name corpora.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: NameSynthesizer) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &NameSynthesizer {
        &self.names
    }

    /// Validate `settings` and run the full pipeline.
    ///
    /// Fails only on invalid settings, before any stage runs. An unset seed
    /// is chosen at random and recorded in the returned world's settings.
    pub fn generate(&self, settings: &GenerationSettings) -> Result<World, GenerationError> {
        settings.validate()?;
        let mut settings = settings.clone();
        let seed = settings.resolve_seed();
        let started = Instant::now();
        log::info!("generating {}x{} world with seed {seed}", settings.width, settings.height);

        let mut rng = WorldRng::new(seed);

        // ── 1–2. Elevation ─────────────────────────────────────────────────
        let raw = noise::heightmap(&settings, &mut rng);
        let mut elevation = relief::shape(&raw, &settings);

        // ── 3. Erosion ─────────────────────────────────────────────────────
        erosion::erode(&mut elevation, settings.erosion.as_ref(), &mut rng);

        // ── 4–5. Climate and biomes ────────────────────────────────────────
        let climate = climate::synthesize(&elevation, settings.water_level, &mut rng);
        let biomes = BiomeGrid::classify(&elevation, &climate, &settings.biomes);
        log::debug!("biomes: {} distinct labels", biomes.histogram().len());

        // ── 6–7. Settlements ───────────────────────────────────────────────
        let hab = habitability::score(&elevation, settings.water_level);
        let settlements = placement::place(
            &elevation,
            &hab,
            settings.water_level,
            &settings.settlements,
            &self.names,
            &rng,
        );

        log::info!(
            "world ready: {} settlements in {} ms",
            settlements.len(),
            started.elapsed().as_millis()
        );
        Ok(World::new(settings, elevation, climate, biomes, settlements))
    }
}

/// Generate a world with the built-in name corpora.
pub fn generate(settings: &GenerationSettings) -> Result<World, GenerationError> {
    WorldGenerator::new().generate(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small(seed: u64) -> GenerationSettings {
        GenerationSettings { width: 64, height: 48, scale: 24.0, seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn generate_small_world_non_flat() {
        let world = generate(&small(42)).unwrap();
        let e = world.elevation();
        assert_eq!((e.width, e.height), (64, 48));
        assert!(e.max_value() - e.min_value() > 0.05, "terrain must not be flat");
        assert_eq!(world.settings().seed, Some(42));
    }

    #[test]
    fn invalid_settings_fail_before_generation() {
        let settings = GenerationSettings { width: 0, ..small(1) };
        let err = generate(&settings).unwrap_err();
        assert!(matches!(err, GenerationError::Config(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn unset_seed_is_recorded() {
        let settings = GenerationSettings { seed: None, ..small(0) };
        let world = generate(&settings).unwrap();
        let seed = world.settings().seed.unwrap();
        let again = generate(&small(seed)).unwrap();
        assert_eq!(world.elevation(), again.elevation());
    }
}
