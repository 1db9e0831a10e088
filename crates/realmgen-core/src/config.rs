//! Generation settings and their validating intake from a generic nested
//! key/value structure (`serde_json::Value`).
//!
//! Every field has a documented default except the erosion sub-fields, which
//! are all required once an `erosion` section is present, and the seed, which
//! stays unset until [`GenerationSettings::resolve_seed`] fixes it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::biome::BiomeThresholds;
use crate::error::ConfigError;
use crate::noise::fbm::Fbm;
use crate::settlement::{PerKind, SettlementKind};

/// Upper bound on `octaves`.
pub const MAX_OCTAVES: u32 = 32;
/// Upper bound on the gradients drawn for any single noise octave.
pub const MAX_LATTICE_POINTS: f64 = (1u64 << 22) as f64;

/// Particle erosion and thermal weathering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionSettings {
    /// Number of simulated water droplets.
    pub droplets: usize,
    /// Fraction of the previous flow direction a droplet keeps each step.
    pub inertia: f64,
    /// Sediment capacity factor.
    pub capacity: f64,
    /// Fraction of excess sediment dropped per step.
    pub deposition: f64,
    /// Fraction of spare capacity filled by erosion per step.
    pub erosion: f64,
    /// Fraction of water lost per step.
    pub evaporation: f64,
    /// Height difference above which thermal weathering moves material.
    pub min_slope: f64,
}

impl ErosionSettings {
    const SECTION: &'static str = "erosion";

    /// Build from an `erosion` configuration object. All keys are required.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let s = Section::new(Self::SECTION, value)?;
        let settings = Self {
            droplets: s.required_usize("droplets")?,
            inertia: s.required_f64("inertia")?,
            capacity: s.required_f64("capacity")?,
            deposition: s.required_f64("deposition")?,
            erosion: s.required_f64("erosion")?,
            evaporation: s.required_f64("evaporation")?,
            min_slope: s.required_f64("min_slope")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, v) in [
            ("inertia", self.inertia),
            ("capacity", self.capacity),
            ("deposition", self.deposition),
            ("erosion", self.erosion),
            ("evaporation", self.evaporation),
            ("min_slope", self.min_slope),
        ] {
            finite(&format!("{}.{name}", Self::SECTION), v)?;
        }
        Ok(())
    }
}

/// How many settlements of each kind to place and how far apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSettings {
    pub counts: PerKind<usize>,
    /// Minimum Euclidean separation in grid cells.
    pub min_distance: PerKind<f64>,
    /// Epoch used to select name models.
    pub name_epoch: String,
    /// Optional culture used to select name models.
    pub name_culture: Option<String>,
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            counts: PerKind {
                capital: 1,
                city: 3,
                town: 5,
                village: 30,
                ruins: 10,
                dungeon: 8,
                temple: 6,
                fortress: 4,
            },
            min_distance: PerKind {
                capital: 40.0,
                city: 20.0,
                town: 10.0,
                village: 5.0,
                ruins: 8.0,
                dungeon: 12.0,
                temple: 15.0,
                fortress: 18.0,
            },
            name_epoch: "empire".to_string(),
            name_culture: None,
        }
    }
}

impl SettlementSettings {
    const SECTION: &'static str = "settlements";

    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let s = Section::new(Self::SECTION, value)?;
        let defaults = Self::default();

        let mut counts = defaults.counts.clone();
        if let Some(v) = s.get("counts") {
            let sub = Section::new("settlements.counts", v)?;
            for kind in SettlementKind::ALL {
                *counts.get_mut(kind) = sub.usize(kind.key(), *defaults.counts.get(kind))?;
            }
        }

        let mut min_distance = defaults.min_distance.clone();
        if let Some(v) = s.get("min_distance") {
            let sub = Section::new("settlements.min_distance", v)?;
            for kind in SettlementKind::ALL {
                *min_distance.get_mut(kind) =
                    sub.f64(kind.key(), *defaults.min_distance.get(kind))?;
            }
        }

        let settings = Self {
            counts,
            min_distance,
            name_epoch: s.string("name_epoch", &defaults.name_epoch)?,
            name_culture: s.opt_string("name_culture")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in SettlementKind::ALL {
            let d = *self.min_distance.get(kind);
            let field = format!("{}.min_distance.{}", Self::SECTION, kind.key());
            finite(&field, d)?;
            if d < 0.0 {
                return Err(ConfigError::OutOfRange { field, value: d, reason: "must be >= 0" });
            }
        }
        Ok(())
    }
}

/// The full parameter bundle for one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub width: usize,
    pub height: usize,
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Noise scale in cells per lattice step at the base octave.
    pub scale: f64,
    /// Exponent of the redistribution curve.
    pub height_power: f64,
    /// Elevation below which a cell is water.
    pub water_level: f64,
    /// Land height scaling, carried for templates.
    pub land_scale: f64,
    pub seed: Option<u64>,
    pub erosion: Option<ErosionSettings>,
    pub biomes: BiomeThresholds,
    pub settlements: SettlementSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            scale: 100.0,
            height_power: 1.2,
            water_level: 0.4,
            land_scale: 0.3,
            seed: None,
            erosion: None,
            biomes: BiomeThresholds::default(),
            settlements: SettlementSettings::default(),
        }
    }
}

impl GenerationSettings {
    const SECTION: &'static str = "settings";

    /// Build and validate settings from a configuration object.
    ///
    /// Absent keys take their defaults; `null` is accepted for `seed`,
    /// `erosion` and `name_culture` as an explicit "unset".
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let s = Section::new(Self::SECTION, value)?;
        let d = Self::default();

        let water_level = s.f64("water_level", d.water_level)?;
        let erosion = match s.get("erosion") {
            None | Some(Value::Null) => None,
            Some(v) => Some(ErosionSettings::from_value(v)?),
        };
        let biomes = match s.get("biomes") {
            None | Some(Value::Null) => BiomeThresholds { ocean_level: water_level, ..d.biomes },
            Some(v) => BiomeThresholds::from_value(v, water_level)?,
        };
        let settlements = match s.get("settlements") {
            None | Some(Value::Null) => d.settlements,
            Some(v) => SettlementSettings::from_value(v)?,
        };

        let settings = Self {
            width: s.usize("width", d.width)?,
            height: s.usize("height", d.height)?,
            octaves: s.u32("octaves", d.octaves)?,
            persistence: s.f64("persistence", d.persistence)?,
            lacunarity: s.f64("lacunarity", d.lacunarity)?,
            scale: s.f64("scale", d.scale)?,
            height_power: s.f64("height_power", d.height_power)?,
            water_level,
            land_scale: s.f64("land_scale", d.land_scale)?,
            seed: s.opt_u64("seed")?,
            erosion,
            biomes,
            settlements,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Re-check every field; used for bundles assembled in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 {
            return Err(out_of_range("width", self.width as f64, "must be >= 2"));
        }
        if self.height < 2 {
            return Err(out_of_range("height", self.height as f64, "must be >= 2"));
        }
        if self.octaves == 0 {
            return Err(out_of_range("octaves", 0.0, "must be >= 1"));
        }
        for (name, v) in [
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
            ("scale", self.scale),
            ("height_power", self.height_power),
        ] {
            finite(name, v)?;
            if v <= 0.0 {
                return Err(out_of_range(name, v, "must be > 0"));
            }
        }
        if self.octaves > MAX_OCTAVES {
            return Err(out_of_range("octaves", self.octaves as f64, "must be <= 32"));
        }
        let peak = Fbm::from_settings(self).peak_lattice_points(self.width, self.height);
        if peak > MAX_LATTICE_POINTS {
            return Err(out_of_range(
                "octaves",
                self.octaves as f64,
                "finest octave lattice exceeds 4194304 points; lower octaves or lacunarity, or raise scale",
            ));
        }
        finite("water_level", self.water_level)?;
        if !(0.0..=1.0).contains(&self.water_level) {
            return Err(out_of_range("water_level", self.water_level, "must be within [0, 1]"));
        }
        finite("land_scale", self.land_scale)?;
        if let Some(erosion) = &self.erosion {
            erosion.validate()?;
        }
        self.biomes.validate()?;
        self.settlements.validate()?;
        Ok(())
    }

    /// The fixed seed, choosing and storing a random one when unset.
    pub fn resolve_seed(&mut self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u32>() as u64;
                log::info!("no seed configured, using random seed {seed}");
                self.seed = Some(seed);
                seed
            }
        }
    }
}

fn out_of_range(field: &str, value: f64, reason: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field: field.to_string(), value, reason }
}

pub(crate) fn finite(field: &str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(field, v, "must be finite"))
    }
}

// ── Typed reads from a configuration object ──────────────────────────────────

/// A named configuration object with typed, defaulted accessors.
pub(crate) struct Section<'a> {
    name: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> Section<'a> {
    pub(crate) fn new(name: &'a str, value: &'a Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self { name, map }),
            _ => Err(ConfigError::NotAnObject { section: name.to_string() }),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    fn field(&self, key: &str) -> String {
        format!("{}.{key}", self.name)
    }

    pub(crate) fn missing_key(&self, key: &str) -> ConfigError {
        ConfigError::MissingKey { section: self.name.to_string(), key: key.to_string() }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidType { field: self.field(key), expected }
    }

    fn as_u64(&self, key: &str, v: &Value) -> Result<u64, ConfigError> {
        v.as_u64().ok_or_else(|| self.invalid(key, "a non-negative integer"))
    }

    fn as_f64(&self, key: &str, v: &Value) -> Result<f64, ConfigError> {
        match v {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.invalid(key, "a number")),
            _ => Err(self.invalid(key, "a number")),
        }
    }

    pub(crate) fn usize(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => self.as_u64(key, v).map(|n| n as usize),
        }
    }

    pub(crate) fn u32(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => {
                let n = self.as_u64(key, v)?;
                u32::try_from(n).map_err(|_| self.invalid(key, "an integer that fits in 32 bits"))
            }
        }
    }

    pub(crate) fn f64(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => self.as_f64(key, v),
        }
    }

    pub(crate) fn opt_u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => self.as_u64(key, v).map(Some),
        }
    }

    pub(crate) fn string(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        match self.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    pub(crate) fn opt_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(key, "a string or null")),
        }
    }

    pub(crate) fn required_string(&self, key: &str) -> Result<String, ConfigError> {
        match self.get(key) {
            None => Err(self.missing_key(key)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    pub(crate) fn required_usize(&self, key: &str) -> Result<usize, ConfigError> {
        let v = self.get(key).ok_or_else(|| self.missing_key(key))?;
        self.as_u64(key, v).map(|n| n as usize)
    }

    pub(crate) fn required_f64(&self, key: &str) -> Result<f64, ConfigError> {
        let v = self.get(key).ok_or_else(|| self.missing_key(key))?;
        self.as_f64(key, v)
    }
}
