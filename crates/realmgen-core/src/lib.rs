//! Deterministic fantasy world generation.
//!
//! A single seed plus a [`GenerationSettings`] bundle produces a [`World`]:
//! an eroded elevation field, climate and biome grids, and a list of named
//! settlements. Stages run strictly in dependency order:
//!
//!   noise → relief → erosion → climate → biome → settlement (habitability,
//!   placement, names) → world assembly.

pub mod biome;
pub mod climate;
pub mod config;
pub mod erosion;
pub mod error;
pub mod field;
pub mod generator;
pub mod names;
pub mod noise;
pub mod relief;
pub mod rng;
pub mod settlement;
pub mod template;
pub mod world;

pub use biome::{Biome, BiomeGrid, BiomeThresholds};
pub use climate::ClimateFields;
pub use config::{ErosionSettings, GenerationSettings, SettlementSettings};
pub use error::{ConfigError, GenerationError, NameError, TemplateError};
pub use field::ScalarField;
pub use generator::{generate, WorldGenerator};
pub use names::{ModelKey, NameKind, NameSynthesizer};
pub use settlement::{Settlement, SettlementKind};
pub use template::{TemplateStore, TerrainTemplate};
pub use world::{DiscoveryMask, RenderSnapshot, World, WorldSummary};
