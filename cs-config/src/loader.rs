// Configuration file loading

use crate::{Config, ConfigError, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Formats a configuration file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// Match a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("json") {
            Some(FileFormat::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(FileFormat::Toml)
        } else {
            None
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            ConfigError::LoadError(format!(
                "Cannot tell the format of {}: expected a .json or .toml extension",
                path.display()
            ))
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Json => f.write_str("JSON"),
            FileFormat::Toml => f.write_str("TOML"),
        }
    }
}

/// Reads configuration documents of one format.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Loader for the format implied by the extension of `path`.
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        FileFormat::from_path(path.as_ref()).map(Self::new)
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Read and decode a configuration file.
    pub fn load_config(&self, path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config = Config::from_value(self.load_file(path)?)?;
        info!(
            path = %path.display(),
            format = %self.format,
            landings = config.landing.len(),
            "Loaded configuration file"
        );
        Ok(config)
    }

    /// Read a file into an untyped document.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
        self.parse(&content)
    }

    /// Parse a document. TOML is converted to the same JSON shape so both
    /// formats decode through one path.
    pub fn parse(&self, content: &str) -> Result<Value> {
        let parsed = match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str::<toml::Value>(content)
                .map_err(|e| e.to_string())
                .and_then(|doc| serde_json::to_value(doc).map_err(|e| e.to_string())),
        };
        parsed.map_err(|e| ConfigError::ParseError(format!("{} config: {}", self.format, e)))
    }
}

/// Load a configuration file, picking the format from its extension.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    ConfigLoader::auto(path)?.load_config(path)
}
