//! Error taxonomy for the generation pipeline.
//!
//! Construction errors abort before any simulation work. Name and template
//! errors are recovered close to where they occur and never abort a world.

use std::path::PathBuf;
use thiserror::Error;

/// A settings bundle could not be built from its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required key '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },
    #[error("field '{field}' must be {expected}")]
    InvalidType { field: String, expected: &'static str },
    #[error("field '{field}' = {value} is out of range: {reason}")]
    OutOfRange { field: String, value: f64, reason: &'static str },
    #[error("section '{section}' must be an object")]
    NotAnObject { section: String },
}

/// Name synthesis failed; callers substitute a fallback name.
#[derive(Debug, Error)]
pub enum NameError {
    #[error("no name model for '{key}' and no default model")]
    ModelNotFound { key: String },
    #[error("corpus for '{key}' contains no names")]
    EmptyCorpus { key: String },
    #[error("name chain produced no usable output from context '{context}'")]
    DeadEnd { context: String },
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A terrain template could not be read, parsed or written.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed template {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings in template {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("template '{name}' not found")]
    NotFound { name: String },
}

/// World generation failed before any stage ran.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generation settings: {0}")]
    Config(#[from] ConfigError),
}
