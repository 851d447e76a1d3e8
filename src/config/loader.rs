//! Configuration file loader
//!
//! Load a raw workflow configuration from a `.json`, `.yaml` or `.yml` file.
//! The result is left untyped so validation can report precise errors.

use std::path::Path;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error in {file}: {error}")]
    Json {
        file: String,
        error: serde_json::Error,
    },

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Unsupported config file extension: {0} (expected .json, .yaml or .yml)")]
    UnsupportedExtension(String),
}

/// Serialization format of a config document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_file(path: &Path) -> Result<Value, LoadError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| LoadError::UnsupportedExtension(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format, &path.display().to_string())
    }

    pub fn load_str(content: &str, format: ConfigFormat) -> Result<Value, LoadError> {
        Self::parse(content, format, "<inline>")
    }

    fn parse(content: &str, format: ConfigFormat, file: &str) -> Result<Value, LoadError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Json {
                file: file.to_string(),
                error: e,
            }),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| LoadError::Yaml {
                file: file.to_string(),
                error: e,
            }),
        }
    }
}
