//! Per-cell biome classification from elevation, temperature and
//! precipitation.
//!
//! The decision table is total: every input triple, NaN included, lands on
//! exactly one [`Biome`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::climate::ClimateFields;
use crate::config::{finite, Section};
use crate::error::ConfigError;
use crate::field::{cells, ScalarField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    DeepOcean,
    ShallowOcean,
    Beach,
    Tundra,
    ColdDesert,
    Grassland,
    TemperateForest,
    TemperateRainforest,
    Savanna,
    Desert,
    TropicalRainforest,
    Mountain,
    SnowPeak,
}

impl Biome {
    pub const ALL: [Biome; 13] = [
        Biome::DeepOcean,
        Biome::ShallowOcean,
        Biome::Beach,
        Biome::Tundra,
        Biome::ColdDesert,
        Biome::Grassland,
        Biome::TemperateForest,
        Biome::TemperateRainforest,
        Biome::Savanna,
        Biome::Desert,
        Biome::TropicalRainforest,
        Biome::Mountain,
        Biome::SnowPeak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Biome::DeepOcean => "deep ocean",
            Biome::ShallowOcean => "shallow ocean",
            Biome::Beach => "beach",
            Biome::Tundra => "tundra",
            Biome::ColdDesert => "cold desert",
            Biome::Grassland => "grassland",
            Biome::TemperateForest => "temperate forest",
            Biome::TemperateRainforest => "temperate rainforest",
            Biome::Savanna => "savanna",
            Biome::Desert => "desert",
            Biome::TropicalRainforest => "tropical rainforest",
            Biome::Mountain => "mountain",
            Biome::SnowPeak => "snow peak",
        }
    }

    /// Single-character map symbol.
    pub fn glyph(self) -> char {
        match self {
            Biome::DeepOcean => '~',
            Biome::ShallowOcean => '-',
            Biome::Beach => '.',
            Biome::Tundra => ':',
            Biome::ColdDesert => ',',
            Biome::Grassland => '"',
            Biome::TemperateForest => 'f',
            Biome::TemperateRainforest => 'F',
            Biome::Savanna => ';',
            Biome::Desert => '_',
            Biome::TropicalRainforest => 'T',
            Biome::Mountain => '^',
            Biome::SnowPeak => 'A',
        }
    }

    /// Display colour as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::DeepOcean => [0, 0, 139],
            Biome::ShallowOcean => [65, 105, 225],
            Biome::Beach => [238, 214, 175],
            Biome::Tundra => [221, 221, 228],
            Biome::ColdDesert => [190, 190, 170],
            Biome::Grassland => [124, 202, 80],
            Biome::TemperateForest => [34, 139, 34],
            Biome::TemperateRainforest => [0, 100, 60],
            Biome::Savanna => [189, 183, 107],
            Biome::Desert => [237, 201, 100],
            Biome::TropicalRainforest => [0, 80, 0],
            Biome::Mountain => [139, 137, 137],
            Biome::SnowPeak => [255, 250, 250],
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::ShallowOcean)
    }
}

/// Band edges for [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeThresholds {
    /// Elevation below which cells are ocean; deep ocean starts 0.1 lower.
    pub ocean_level: f64,
    /// Elevation above which cells are bare mountain or snow peak.
    pub mountain_level: f64,
    /// Temperature below which cells are cold.
    pub cold: f64,
    /// Temperature below which non-cold cells are temperate.
    pub temperate: f64,
    /// Precipitation below which cells are dry.
    pub dry: f64,
    /// Precipitation at or above which cells are wet.
    pub wet: f64,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self { ocean_level: 0.4, mountain_level: 0.7, cold: 0.2, temperate: 0.6, dry: 0.2, wet: 0.6 }
    }
}

const DEEP_OCEAN_DEPTH: f64 = 0.1;
const BEACH_WIDTH: f64 = 0.05;

impl BiomeThresholds {
    /// Build from a `biomes` configuration object. `ocean_level` defaults to
    /// the configured water level.
    pub fn from_value(value: &Value, water_level: f64) -> Result<Self, ConfigError> {
        let s = Section::new("biomes", value)?;
        let d = Self::default();
        let thresholds = Self {
            ocean_level: s.f64("ocean_level", water_level)?,
            mountain_level: s.f64("mountain_level", d.mountain_level)?,
            cold: s.f64("cold", d.cold)?,
            temperate: s.f64("temperate", d.temperate)?,
            dry: s.f64("dry", d.dry)?,
            wet: s.f64("wet", d.wet)?,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, v) in [
            ("biomes.ocean_level", self.ocean_level),
            ("biomes.mountain_level", self.mountain_level),
            ("biomes.cold", self.cold),
            ("biomes.temperate", self.temperate),
            ("biomes.dry", self.dry),
            ("biomes.wet", self.wet),
        ] {
            finite(name, v)?;
        }
        if self.temperate < self.cold {
            return Err(ConfigError::OutOfRange {
                field: "biomes.temperate".into(),
                value: self.temperate,
                reason: "must not be below biomes.cold",
            });
        }
        if self.wet < self.dry {
            return Err(ConfigError::OutOfRange {
                field: "biomes.wet".into(),
                value: self.wet,
                reason: "must not be below biomes.dry",
            });
        }
        Ok(())
    }
}

/// Classify one cell. Checks run in precedence order: ocean depth, beach,
/// mountain, then temperature band crossed with precipitation band.
pub fn classify(elevation: f64, temperature: f64, precipitation: f64, th: &BiomeThresholds) -> Biome {
    if elevation < th.ocean_level - DEEP_OCEAN_DEPTH {
        Biome::DeepOcean
    } else if elevation < th.ocean_level {
        Biome::ShallowOcean
    } else if elevation < th.ocean_level + BEACH_WIDTH {
        Biome::Beach
    } else if elevation > th.mountain_level {
        if temperature < th.cold {
            Biome::SnowPeak
        } else {
            Biome::Mountain
        }
    } else if temperature < th.cold {
        if precipitation < th.dry {
            Biome::ColdDesert
        } else {
            Biome::Tundra
        }
    } else if temperature < th.temperate {
        if precipitation < th.dry {
            Biome::Grassland
        } else if precipitation < th.wet {
            Biome::TemperateForest
        } else {
            Biome::TemperateRainforest
        }
    } else if precipitation < th.dry {
        Biome::Desert
    } else if precipitation < th.wet {
        Biome::Savanna
    } else {
        Biome::TropicalRainforest
    }
}

/// Dense grid of biome labels, co-indexed with the elevation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeGrid {
    pub cells: Vec<Biome>,
    pub width: usize,
    pub height: usize,
}

impl BiomeGrid {
    pub fn classify(elevation: &ScalarField, climate: &ClimateFields, th: &BiomeThresholds) -> Self {
        let (width, height) = (elevation.width, elevation.height);
        let cells = cells(width, height, |r, c| {
            classify(
                elevation.get(r, c),
                climate.temperature.get(r, c),
                climate.precipitation.get(r, c),
                th,
            )
        });
        Self { cells, width, height }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Biome {
        self.cells[row * self.width + col]
    }

    /// Cell count per biome; biomes that never occur are omitted.
    pub fn histogram(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for &b in &self.cells {
            *counts.entry(b).or_insert(0) += 1;
        }
        counts
    }
}
