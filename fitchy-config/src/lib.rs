//! Configuration loading for Fitchy
//!
//! Collects the configuration descriptor (`fitchy.feature.status`,
//! `fitchy.feature.reader`, `fitchy.proxy.observer`, plus the optional
//! `fitchy.features.path`) from properties, TOML or JSON files, `.env` files
//! and `FITCHY_*` environment variables, then builds the core
//! [`Configuration`](fitchy_core::Configuration) and
//! [`FeatureContext`](fitchy_core::FeatureContext).
//!
//! ```
//! use fitchy_config::{FeatureService, FileFormat};
//!
//! let service = FeatureService::builder()
//!     .with_defaults()
//!     .add_str("fitchy.proxy.observer=subclass", FileFormat::Properties)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(service.config().observer_id(), "subclass");
//! assert!(service.context().is_empty());
//! ```

pub mod config_service;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use config_service::{FeatureService, FeatureServiceBuilder};
pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use fitchy_core::{
    ComponentRegistry, Configuration, ConfigurationBuilder, DEFAULT_STATUS_ID, OBSERVER_KEY,
    PROPERTIES_READER_ID, PROXY_INTERCEPTOR_ID, Properties, READER_KEY, STATUS_KEY,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Descriptor key naming the features file.
pub const FEATURES_PATH_KEY: &str = "fitchy.features.path";

/// The resolved descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "fitchy.feature.status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "fitchy.feature.reader", default, skip_serializing_if = "Option::is_none")]
    pub reader: Option<String>,

    #[serde(rename = "fitchy.proxy.observer", default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<String>,

    #[serde(rename = "fitchy.features.path", default, skip_serializing_if = "Option::is_none")]
    pub features_path: Option<PathBuf>,
}

impl Descriptor {
    /// The built-in descriptor: default statuses, properties reader, proxy
    /// interceptor, no features file
    pub fn defaults() -> Self {
        Self {
            status: Some(DEFAULT_STATUS_ID.to_string()),
            reader: Some(PROPERTIES_READER_ID.to_string()),
            observer: Some(PROXY_INTERCEPTOR_ID.to_string()),
            features_path: None,
        }
    }

    pub fn to_properties(&self) -> Properties {
        let mut properties = Properties::new();
        let entries = [
            (STATUS_KEY, &self.status),
            (READER_KEY, &self.reader),
            (OBSERVER_KEY, &self.observer),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                properties.set(key, value.as_str());
            }
        }
        if let Some(path) = &self.features_path {
            properties.set(FEATURES_PATH_KEY, path.to_string_lossy().into_owned());
        }
        properties
    }

    /// Resolve the identifiers through `registry`
    pub fn configuration(&self, registry: &ComponentRegistry) -> Result<Configuration> {
        self.validate()?;
        let builder = ConfigurationBuilder::from_properties(&self.to_properties(), registry)?;
        Ok(builder.build())
    }
}

impl Validate for Descriptor {
    fn validate(&self) -> Result<()> {
        ConfigValidator::required(self.status.as_deref(), STATUS_KEY)?;
        ConfigValidator::required(self.reader.as_deref(), READER_KEY)?;
        ConfigValidator::required(self.observer.as_deref(), OBSERVER_KEY)?;
        if let Some(path) = &self.features_path {
            ConfigValidator::not_empty(&path.to_string_lossy(), FEATURES_PATH_KEY)?;
        }
        Ok(())
    }
}

/// Layered descriptor entries; later loads override earlier ones
#[derive(Clone)]
pub struct ConfigManager {
    entries: Arc<RwLock<Properties>>,
    env_prefix: String,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    /// Read environment overrides from `{prefix}_*` instead of `FITCHY_*`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Properties::new())),
            env_prefix: prefix.into(),
        }
    }

    /// Load the built-in descriptor entries
    pub fn load_defaults(&self) {
        self.merge_properties(Descriptor::defaults().to_properties());
    }

    /// Load overrides from prefixed environment variables
    pub fn load_env(&self) -> Result<()> {
        let overrides = EnvLoader::new(self.env_prefix.clone()).overrides()?;
        debug!(prefix = %self.env_prefix, overrides = overrides.len(), "Loaded environment overrides");
        self.merge_properties(overrides);
        Ok(())
    }

    /// Load a `.env` file into the process environment, then the overrides
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok();
        }
        self.load_env()
    }

    pub fn load_file(&self, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
        let path = path.as_ref();
        let properties = ConfigLoader::new(format).load_file(path)?;
        debug!(path = %path.display(), entries = properties.len(), "Loaded descriptor file");
        self.merge_properties(properties);
        Ok(())
    }

    pub fn load_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let properties = ConfigLoader::new(format).parse(content)?;
        self.merge_properties(properties);
        Ok(())
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.entries.write().set(key, value);
    }

    pub fn get(&self, key: &str) -> Result<String> {
        self.entries
            .read()
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|_| default.to_string())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Copy every entry of `other` over this manager's entries
    pub fn merge(&self, other: &ConfigManager) {
        let snapshot = other.entries.read().clone();
        self.merge_properties(snapshot);
    }

    /// Deserialize and validate the descriptor
    pub fn descriptor(&self) -> Result<Descriptor> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .entries
            .read()
            .iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::String(value.to_string())))
            .collect();

        let descriptor: Descriptor = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        descriptor.validate()?;
        Ok(descriptor)
    }

    fn merge_properties(&self, properties: Properties) {
        let mut entries = self.entries.write();
        for (key, value) in properties.into_entries() {
            entries.set(key, value);
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
