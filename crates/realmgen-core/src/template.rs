//! Named terrain templates persisted as one JSON file each.
//!
//! Loading goes through [`GenerationSettings::from_value`], so a template on
//! disk is validated exactly like a configuration file. A malformed file is
//! reported and skipped; it never prevents the others from loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{GenerationSettings, Section};
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainTemplate {
    pub name: String,
    pub description: String,
    pub settings: GenerationSettings,
}

impl TerrainTemplate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, settings: GenerationSettings) -> Self {
        Self { name: name.into(), description: description.into(), settings }
    }

    /// File stem: the lowercased name with every character other than a
    /// letter, digit or `-` replaced by an underscore, so the file always
    /// lands directly inside the store directory.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "unnamed".to_string()
        } else {
            stem
        }
    }

    /// Validate and build a template from its JSON form.
    pub fn from_value(value: &Value, path: &Path) -> Result<Self, TemplateError> {
        let invalid = |source| TemplateError::Invalid { path: path.to_path_buf(), source };
        let s = Section::new("template", value).map_err(invalid)?;
        let name = s.required_string("name").map_err(invalid)?;
        let description = s.string("description", "").map_err(invalid)?;
        let settings = s
            .get("settings")
            .ok_or_else(|| s.missing_key("settings"))
            .and_then(GenerationSettings::from_value)
            .map_err(invalid)?;
        Ok(Self { name, description, settings })
    }

    pub fn read(path: &Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path)
            .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|source| TemplateError::Parse { path: path.to_path_buf(), source })?;
        Self::from_value(&value, path)
    }
}

/// Outcome of loading one template file.
pub type LoadReport = Vec<(PathBuf, Result<TerrainTemplate, TemplateError>)>;

/// A directory of templates indexed by name.
#[derive(Debug)]
pub struct TemplateStore {
    dir: PathBuf,
    templates: BTreeMap<String, TerrainTemplate>,
}

impl TemplateStore {
    /// Open `dir`, creating it if needed, and load every template in it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| TemplateError::Io { path: dir.clone(), source })?;
        let mut store = Self { dir, templates: BTreeMap::new() };
        store.load_all()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Re-read every `*.json` file in the directory. Files that fail are
    /// logged and left out of the index; the per-file outcome is returned.
    pub fn load_all(&mut self) -> Result<LoadReport, TemplateError> {
        let io = |source| TemplateError::Io { path: self.dir.clone(), source };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io)? {
            let path = entry.map_err(io)?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        self.templates.clear();
        let mut report = Vec::with_capacity(paths.len());
        for path in paths {
            let outcome = TerrainTemplate::read(&path);
            match &outcome {
                Ok(template) => {
                    self.templates.insert(template.name.clone(), template.clone());
                }
                Err(e) => log::warn!("skipping template: {e}"),
            }
            report.push((path, outcome));
        }
        log::debug!("loaded {} templates from {}", self.templates.len(), self.dir.display());
        Ok(report)
    }

    /// Write `template` as pretty JSON and index it. Overwrites a template
    /// with the same file stem.
    pub fn save(&mut self, template: TerrainTemplate) -> Result<PathBuf, TemplateError> {
        let path = self.dir.join(format!("{}.json", template.file_stem()));
        let json = serde_json::to_string_pretty(&template)
            .map_err(|source| TemplateError::Parse { path: path.clone(), source })?;
        fs::write(&path, json).map_err(|source| TemplateError::Io { path: path.clone(), source })?;
        log::info!("saved template '{}' to {}", template.name, path.display());
        self.templates.insert(template.name.clone(), template);
        Ok(path)
    }

    pub fn get(&self, name: &str) -> Result<&TerrainTemplate, TemplateError> {
        self.templates.get(name).ok_or_else(|| TemplateError::NotFound { name: name.to_string() })
    }

    /// `(name, description)` of every loaded template, sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.templates.values().map(|t| (t.name.as_str(), t.description.as_str())).collect()
    }
}
