//! The assembled world: read-only generated layers plus a mutable discovery
//! mask for exploration state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::biome::{Biome, BiomeGrid};
use crate::climate::ClimateFields;
use crate::config::GenerationSettings;
use crate::field::ScalarField;
use crate::settlement::{Settlement, SettlementKind};

/// Fraction of the land range above which a cell counts as mountainous in
/// [`World::summary`].
const SUMMARY_MOUNTAIN_FRACTION: f64 = 0.7;

/// Which cells the player has seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryMask {
    width: usize,
    height: usize,
    revealed: Vec<bool>,
}

impl DiscoveryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, revealed: vec![false; width * height] }
    }

    /// Reveal every cell within Euclidean `radius` of `(row, col)`.
    pub fn reveal(&mut self, row: usize, col: usize, radius: usize) {
        if self.revealed.is_empty() {
            return;
        }
        // Any radius beyond the grid reveals the same cells.
        let radius = radius.min(self.width.max(self.height));
        let r2 = radius * radius;
        let rows = row.saturating_sub(radius)..=row.saturating_add(radius).min(self.height - 1);
        for r in rows {
            let cols = col.saturating_sub(radius)..=col.saturating_add(radius).min(self.width - 1);
            for c in cols {
                let (dr, dc) = (r.abs_diff(row), c.abs_diff(col));
                if dr * dr + dc * dc <= r2 {
                    self.revealed[r * self.width + c] = true;
                }
            }
        }
    }

    /// Out-of-bounds cells are never revealed.
    pub fn is_revealed(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.revealed[row * self.width + col]
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|&&r| r).count()
    }
}

/// Aggregate statistics for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub land_fraction: f64,
    pub water_fraction: f64,
    pub mountain_fraction: f64,
    pub biomes: BTreeMap<Biome, usize>,
    pub settlements: BTreeMap<SettlementKind, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub glyph: char,
    pub color: [u8; 3],
}

/// Everything an external renderer needs, borrowed from the world.
#[derive(Debug, Serialize)]
pub struct RenderSnapshot<'a> {
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub water_level: f64,
    pub elevation: &'a [f64],
    pub temperature: &'a [f64],
    pub precipitation: &'a [f64],
    pub biomes: &'a [Biome],
    pub settlements: &'a [Settlement],
    pub discovered: &'a [bool],
    pub biome_legend: Vec<LegendEntry>,
    pub settlement_legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone)]
pub struct World {
    settings: GenerationSettings,
    elevation: ScalarField,
    climate: ClimateFields,
    biomes: BiomeGrid,
    settlements: Vec<Settlement>,
    discovery: DiscoveryMask,
}

impl World {
    pub(crate) fn new(
        settings: GenerationSettings,
        elevation: ScalarField,
        climate: ClimateFields,
        biomes: BiomeGrid,
        settlements: Vec<Settlement>,
    ) -> Self {
        let discovery = DiscoveryMask::new(elevation.width, elevation.height);
        Self { settings, elevation, climate, biomes, settlements, discovery }
    }

    /// Settings with the seed that produced this world filled in.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn width(&self) -> usize {
        self.elevation.width
    }

    pub fn height(&self) -> usize {
        self.elevation.height
    }

    pub fn elevation(&self) -> &ScalarField {
        &self.elevation
    }

    pub fn climate(&self) -> &ClimateFields {
        &self.climate
    }

    pub fn biomes(&self) -> &BiomeGrid {
        &self.biomes
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn discovery(&self) -> &DiscoveryMask {
        &self.discovery
    }

    pub fn discovery_mut(&mut self) -> &mut DiscoveryMask {
        &mut self.discovery
    }

    pub fn summary(&self) -> WorldSummary {
        let water_level = self.settings.water_level;
        let mountain_level = water_level + (1.0 - water_level) * SUMMARY_MOUNTAIN_FRACTION;
        let n = self.elevation.len().max(1) as f64;
        let water = self.elevation.data.iter().filter(|&&e| e < water_level).count() as f64;
        let mountain = self.elevation.data.iter().filter(|&&e| e > mountain_level).count() as f64;

        let mut settlements = BTreeMap::new();
        for s in &self.settlements {
            *settlements.entry(s.kind).or_insert(0) += 1;
        }

        WorldSummary {
            width: self.width(),
            height: self.height(),
            seed: self.settings.seed,
            land_fraction: 1.0 - water / n,
            water_fraction: water / n,
            mountain_fraction: mountain / n,
            biomes: self.biomes.histogram(),
            settlements,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            width: self.width(),
            height: self.height(),
            seed: self.settings.seed,
            water_level: self.settings.water_level,
            elevation: &self.elevation.data,
            temperature: &self.climate.temperature.data,
            precipitation: &self.climate.precipitation.data,
            biomes: &self.biomes.cells,
            settlements: &self.settlements,
            discovered: &self.discovery.revealed,
            biome_legend: Biome::ALL
                .iter()
                .map(|b| LegendEntry { label: b.name(), glyph: b.glyph(), color: b.color() })
                .collect(),
            settlement_legend: SettlementKind::ALL
                .iter()
                .map(|k| LegendEntry { label: k.key(), glyph: k.glyph(), color: k.color() })
                .collect(),
        }
    }

    /// A `cols x rows` glyph map, nearest-cell downsampled, with settlements
    /// drawn over the biomes.
    pub fn preview(&self, cols: usize, rows: usize) -> String {
        let (w, h) = (self.width(), self.height());
        if cols == 0 || rows == 0 || w == 0 || h == 0 {
            return String::new();
        }
        let mut grid: Vec<Vec<char>> = (0..rows)
            .map(|pr| {
                let r = (pr * h / rows).min(h - 1);
                (0..cols).map(|pc| self.biomes.get(r, (pc * w / cols).min(w - 1)).glyph()).collect()
            })
            .collect();
        for s in &self.settlements {
            let pr = (s.position.0 * rows / h).min(rows - 1);
            let pc = (s.position.1 * cols / w).min(cols - 1);
            grid[pr][pc] = s.kind.glyph();
        }
        grid.into_iter().map(|row| row.into_iter().collect::<String>()).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeThresholds;

    fn tiny_world() -> World {
        let elevation = ScalarField::from_fn(10, 10, |_, c| c as f64 / 9.0);
        let climate = ClimateFields {
            temperature: ScalarField::new(10, 10, 0.5),
            precipitation: ScalarField::new(10, 10, 0.5),
        };
        let biomes = BiomeGrid::classify(&elevation, &climate, &BiomeThresholds::default());
        let settlements = vec![Settlement::new(SettlementKind::Town, (5, 6), "Ashby".into(), 1.0)];
        World::new(GenerationSettings::default(), elevation, climate, biomes, settlements)
    }

    #[test]
    fn reveal_marks_a_disc() {
        let mut mask = DiscoveryMask::new(9, 9);
        mask.reveal(4, 4, 2);
        assert!(mask.is_revealed(4, 4));
        assert!(mask.is_revealed(2, 4));
        assert!(!mask.is_revealed(2, 2), "corner of the box is outside the disc");
        assert_eq!(mask.revealed_count(), 13);
        assert!(!mask.is_revealed(20, 20));
    }

    #[test]
    fn reveal_clips_at_borders() {
        let mut mask = DiscoveryMask::new(5, 5);
        mask.reveal(0, 0, 1);
        assert_eq!(mask.revealed_count(), 3);
    }

    #[test]
    fn huge_radius_reveals_everything_once() {
        let mut mask = DiscoveryMask::new(6, 4);
        mask.reveal(1, 2, usize::MAX);
        assert_eq!(mask.revealed_count(), 24);

        let mut edge = DiscoveryMask::new(5, 5);
        edge.reveal(6, 2, 2);
        assert_eq!(edge.revealed_count(), 1, "centre off the grid still reaches the last row");
    }

    #[test]
    fn summary_fractions_add_up() {
        let world = tiny_world();
        let s = world.summary();
        assert!((s.land_fraction + s.water_fraction - 1.0).abs() < 1e-12);
        assert_eq!(s.water_fraction, 0.4);
        assert_eq!(s.biomes.values().sum::<usize>(), 100);
        assert_eq!(s.settlements.get(&SettlementKind::Town), Some(&1));
    }

    #[test]
    fn discovery_is_the_only_mutable_layer() {
        let mut world = tiny_world();
        world.discovery_mut().reveal(5, 5, 1);
        assert!(world.discovery().is_revealed(5, 5));
        assert_eq!(world.snapshot().discovered.iter().filter(|&&d| d).count(), 5);
    }

    #[test]
    fn preview_draws_settlements_over_biomes() {
        let world = tiny_world();
        let text = world.preview(10, 10);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[5].chars().nth(6), Some('t'));
        assert_eq!(rows[0].chars().next(), Some('~'));
    }

    #[test]
    fn snapshot_serialises() {
        let world = tiny_world();
        let json = serde_json::to_value(world.snapshot()).unwrap();
        assert_eq!(json["width"], 10);
        assert_eq!(json["biome_legend"].as_array().map(Vec::len), Some(13));
    }
}
