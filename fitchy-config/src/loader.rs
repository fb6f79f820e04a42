// Descriptor file loaders

use crate::{ConfigError, Result};
use fitchy_core::Properties;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported descriptor file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Properties,
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "properties" => Some(FileFormat::Properties),
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Reads descriptor files into flat `key=value` entries.
///
/// Nested TOML/JSON tables are flattened into dotted keys, so
/// `[fitchy.feature] status = "..."` and `"fitchy.feature.status": "..."`
/// produce the same entry.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Detect the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Properties> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::LoadError(format!("Failed to read file: {}", e)))?;

        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Properties> {
        match self.format {
            FileFormat::Properties => Ok(Properties::parse(content)),
            FileFormat::Toml => self.parse_toml(content),
            FileFormat::Json => self.parse_json(content),
        }
    }

    fn parse_json(&self, content: &str) -> Result<Properties> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?;

        flatten(value)
    }

    fn parse_toml(&self, content: &str) -> Result<Properties> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        let value = serde_json::to_value(&table)
            .map_err(|e| ConfigError::ParseError(format!("TOML to JSON conversion error: {}", e)))?;

        flatten(value)
    }
}

fn flatten(value: Value) -> Result<Properties> {
    let Value::Object(map) = value else {
        return Err(ConfigError::ParseError(
            "descriptor root must be a table".to_string(),
        ));
    };

    let mut properties = Properties::new();
    for (key, value) in map {
        flatten_into(&mut properties, key, value)?;
    }
    Ok(properties)
}

fn flatten_into(properties: &mut Properties, key: String, value: Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(properties, format!("{}.{}", key, child), value)?;
            }
        }
        Value::String(s) => properties.set(key, s),
        Value::Bool(b) => properties.set(key, b.to_string()),
        Value::Number(n) => properties.set(key, n.to_string()),
        Value::Null => properties.set(key, ""),
        Value::Array(_) => {
            return Err(ConfigError::ParseError(format!(
                "'{}' must not be an array",
                key
            )));
        }
    }
    Ok(())
}
