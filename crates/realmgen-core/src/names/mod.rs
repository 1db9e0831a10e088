//! Name synthesis from per-epoch, per-culture Markov models.
//!
//! Corpora are keyed by file stem: `default`, `<epoch>_<type>` or
//! `<epoch>_<culture>_<type>`. A request with no matching model falls back to
//! `default`; without that it fails with [`NameError::ModelNotFound`].
pub mod markov;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;
use crate::rng::WorldRng;
use markov::{MarkovModel, DEFAULT_ORDER};

/// Family of names a model produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    Settlement,
    Ruins,
    Dungeon,
    Temple,
    Fortress,
}

impl NameKind {
    pub fn key(self) -> &'static str {
        match self {
            NameKind::Settlement => "settlement",
            NameKind::Ruins => "ruins",
            NameKind::Dungeon => "dungeon",
            NameKind::Temple => "temple",
            NameKind::Fortress => "fortress",
        }
    }
}

impl FromStr for NameKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settlement" => Ok(NameKind::Settlement),
            "ruins" => Ok(NameKind::Ruins),
            "dungeon" => Ok(NameKind::Dungeon),
            "temple" => Ok(NameKind::Temple),
            "fortress" => Ok(NameKind::Fortress),
            _ => Err(()),
        }
    }
}

/// Identifies one trained model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelKey {
    Default,
    Scoped { epoch: String, culture: Option<String>, kind: NameKind },
}

impl ModelKey {
    pub fn scoped(epoch: &str, culture: Option<&str>, kind: NameKind) -> Self {
        ModelKey::Scoped {
            epoch: epoch.to_lowercase(),
            culture: culture.map(str::to_lowercase),
            kind,
        }
    }

    /// Parse a corpus file stem. Returns `None` for unrecognised stems.
    pub fn parse(stem: &str) -> Option<Self> {
        if stem == "default" {
            return Some(ModelKey::Default);
        }
        let parts: Vec<&str> = stem.split('_').collect();
        match parts.as_slice() {
            [epoch, kind] if !epoch.is_empty() => {
                Some(ModelKey::scoped(epoch, None, kind.parse().ok()?))
            }
            [epoch, culture, kind] if !epoch.is_empty() && !culture.is_empty() => {
                Some(ModelKey::scoped(epoch, Some(*culture), kind.parse().ok()?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKey::Default => f.write_str("default"),
            ModelKey::Scoped { epoch, culture: None, kind } => write!(f, "{epoch}_{}", kind.key()),
            ModelKey::Scoped { epoch, culture: Some(c), kind } => {
                write!(f, "{epoch}_{c}_{}", kind.key())
            }
        }
    }
}

/// Corpora compiled into the library.
const BUILTIN: &[(&str, &str)] = &[
    ("default", include_str!("../../data/names/default.txt")),
    ("empire_settlement", include_str!("../../data/names/empire_settlement.txt")),
    ("empire_ruins", include_str!("../../data/names/empire_ruins.txt")),
    ("empire_dungeon", include_str!("../../data/names/empire_dungeon.txt")),
    ("empire_temple", include_str!("../../data/names/empire_temple.txt")),
    ("empire_fortress", include_str!("../../data/names/empire_fortress.txt")),
    ("empire_elven_settlement", include_str!("../../data/names/empire_elven_settlement.txt")),
];

/// A read-only set of trained name models.
#[derive(Debug, Clone)]
pub struct NameSynthesizer {
    models: HashMap<ModelKey, MarkovModel>,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for NameSynthesizer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NameSynthesizer {
    pub const DEFAULT_MIN_LENGTH: usize = 3;
    pub const DEFAULT_MAX_LENGTH: usize = 12;

    /// No models at all; every request fails.
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            min_length: Self::DEFAULT_MIN_LENGTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }

    /// The corpora shipped with the library.
    pub fn builtin() -> Self {
        Self::from_corpora(BUILTIN.iter().copied(), DEFAULT_ORDER)
    }

    /// Train one model per `(stem, text)` pair; `text` holds one name per
    /// line. Unrecognised stems and empty corpora are skipped with a warning.
    pub fn from_corpora<'a>(corpora: impl IntoIterator<Item = (&'a str, &'a str)>, order: usize) -> Self {
        let mut synth = Self::empty();
        for (stem, text) in corpora {
            let Some(key) = ModelKey::parse(stem) else {
                log::warn!("ignoring name corpus with unrecognised key '{stem}'");
                continue;
            };
            match MarkovModel::train(stem, text.lines(), order) {
                Ok(model) => {
                    synth.models.insert(key, model);
                }
                Err(e) => log::warn!("skipping name corpus: {e}"),
            }
        }
        synth
    }

    /// Load every `*.txt` corpus in `dir`.
    pub fn from_dir(dir: &Path, order: usize) -> Result<Self, NameError> {
        let io = |source| NameError::Io { path: dir.to_path_buf(), source };
        let mut texts = Vec::new();
        for entry in fs::read_dir(dir).map_err(io)? {
            let path = entry.map_err(io)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let text = fs::read_to_string(&path)
                .map_err(|source| NameError::Io { path: path.clone(), source })?;
            texts.push((stem, text));
        }
        texts.sort();
        let synth = Self::from_corpora(texts.iter().map(|(s, t)| (s.as_str(), t.as_str())), order);
        log::debug!("loaded {} name models from {}", synth.models.len(), dir.display());
        Ok(synth)
    }

    pub fn has_model(&self, key: &ModelKey) -> bool {
        self.models.contains_key(key)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Generate one title-cased name.
    pub fn generate(
        &self,
        epoch: &str,
        culture: Option<&str>,
        kind: NameKind,
        rng: &mut WorldRng,
    ) -> Result<String, NameError> {
        let key = ModelKey::scoped(epoch, culture, kind);
        let model = match self.models.get(&key) {
            Some(model) => model,
            None => {
                log::debug!("no name model for {key}, using default");
                self.models
                    .get(&ModelKey::Default)
                    .ok_or_else(|| NameError::ModelNotFound { key: key.to_string() })?
            }
        };
        model.generate(self.min_length, self.max_length, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_keys_round_trip_through_stems() {
        for stem in ["default", "empire_settlement", "mythic_dwarven_dungeon"] {
            let key = ModelKey::parse(stem).unwrap();
            assert_eq!(key.to_string(), stem);
        }
        assert_eq!(ModelKey::parse("empire_castle"), None);
        assert_eq!(ModelKey::parse("readme"), None);
        assert_eq!(ModelKey::parse("a_b_c_settlement"), None);
    }

    #[test]
    fn builtin_covers_every_kind() {
        let synth = NameSynthesizer::builtin();
        assert!(synth.has_model(&ModelKey::Default));
        for kind in [
            NameKind::Settlement,
            NameKind::Ruins,
            NameKind::Dungeon,
            NameKind::Temple,
            NameKind::Fortress,
        ] {
            assert!(synth.has_model(&ModelKey::scoped("empire", None, kind)), "{kind:?}");
        }
    }

    #[test]
    fn same_stream_same_names() {
        let synth = NameSynthesizer::builtin();
        let draw = |seed| {
            let mut rng = WorldRng::new(seed);
            (0..5)
                .map(|_| synth.generate("empire", None, NameKind::Settlement, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(3), draw(3));
    }

    #[test]
    fn unknown_epoch_falls_back_to_default() {
        let synth = NameSynthesizer::from_corpora([("default", "Marrow\nKestle\nVantor")], 2);
        let name = synth.generate("mythic", None, NameKind::Temple, &mut WorldRng::new(1));
        assert!(name.is_ok());
    }

    #[test]
    fn no_default_means_model_not_found() {
        let synth = NameSynthesizer::from_corpora([("empire_ruins", "Old Keep")], 2);
        let err = synth.generate("empire", None, NameKind::Temple, &mut WorldRng::new(1)).unwrap_err();
        assert!(matches!(err, NameError::ModelNotFound { ref key } if key == "empire_temple"));
    }

    #[test]
    fn from_dir_loads_txt_files_only() {
        let dir = std::env::temp_dir().join(format!("realmgen-names-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("default.txt"), "Harrow\nWendel\n").unwrap();
        fs::write(dir.join("empire_temple.txt"), "Shrine of Ash\n").unwrap();
        fs::write(dir.join("notes.md"), "not a corpus").unwrap();
        fs::write(dir.join("bogus.txt"), "Nope\n").unwrap();

        let synth = NameSynthesizer::from_dir(&dir, 2).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(synth.model_count(), 2);
        assert!(synth.has_model(&ModelKey::scoped("empire", None, NameKind::Temple)));
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let err = NameSynthesizer::from_dir(Path::new("/definitely/not/here"), 2).unwrap_err();
        assert!(matches!(err, NameError::Io { .. }));
    }
}
