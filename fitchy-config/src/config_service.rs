// FeatureService - configuration and context built from a descriptor

use crate::{ConfigError, ConfigManager, Descriptor, FEATURES_PATH_KEY, FileFormat, Result};
use fitchy_core::{ComponentRegistry, Configuration, ContextBuilder, FeatureContext, global};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A configuration together with the feature context built for it
#[derive(Debug, Clone)]
pub struct FeatureService {
    config: Arc<Configuration>,
    context: Arc<FeatureContext>,
    features_path: Option<PathBuf>,
}

impl FeatureService {
    pub fn builder() -> FeatureServiceBuilder {
        FeatureServiceBuilder::new()
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn context(&self) -> &Arc<FeatureContext> {
        &self.context
    }

    pub fn features_path(&self) -> Option<&Path> {
        self.features_path.as_deref()
    }

    /// Re-read the features file and swap the context's feature set.
    ///
    /// Unlike the initial load, a missing file is an error; the current
    /// feature set stays in place.
    pub fn reload(&self) -> Result<usize> {
        let path = self
            .features_path
            .as_ref()
            .ok_or_else(|| ConfigError::KeyNotFound(FEATURES_PATH_KEY.to_string()))?;

        let file = File::open(path)?;
        let mut reader = self
            .config
            .reader()
            .create(Some(Box::new(file)), self.config.clone());
        let count = self.context.reload(reader.as_mut())?;

        info!(path = %path.display(), features = count, "Reloaded features");
        Ok(count)
    }

    /// Make this configuration and context the process-wide ones
    pub fn install_global(&self) {
        global::set_configuration(self.config.clone());
        global::set_context(self.context.clone());
    }
}

/// Builder for FeatureService
pub struct FeatureServiceBuilder {
    manager: ConfigManager,
    registry: ComponentRegistry,
    load_defaults: bool,
    load_env: bool,
    load_dotenv: bool,
    dotenv_path: Option<PathBuf>,
    sources: Vec<Source>,
}

enum Source {
    File(PathBuf, FileFormat),
    Inline(String, FileFormat),
}

impl FeatureServiceBuilder {
    pub fn new() -> Self {
        Self {
            manager: ConfigManager::new(),
            registry: ComponentRegistry::new(),
            load_defaults: false,
            load_env: false,
            load_dotenv: false,
            dotenv_path: None,
            sources: Vec::new(),
        }
    }

    /// Set environment variable prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.manager = ConfigManager::with_prefix(prefix);
        self
    }

    /// Resolve identifiers through this registry instead of the built-in one
    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Start from the built-in descriptor
    pub fn with_defaults(mut self) -> Self {
        self.load_defaults = true;
        self
    }

    /// Apply environment variable overrides
    pub fn load_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Load a .env file before the environment overrides
    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    /// Add a descriptor file
    pub fn add_file(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.sources.push(Source::File(path.into(), format));
        self
    }

    /// Add descriptor text
    pub fn add_str(mut self, content: impl Into<String>, format: FileFormat) -> Self {
        self.sources.push(Source::Inline(content.into(), format));
        self
    }

    /// Layers apply in order: defaults, sources, .env, environment.
    pub fn build(self) -> Result<FeatureService> {
        if self.load_defaults {
            self.manager.load_defaults();
        }

        for source in &self.sources {
            match source {
                Source::File(path, format) => self.manager.load_file(path, *format)?,
                Source::Inline(content, format) => self.manager.load_str(content, *format)?,
            }
        }

        if self.load_dotenv {
            self.manager.load_dotenv(self.dotenv_path.as_deref())?;
        } else if self.load_env {
            self.manager.load_env()?;
        }

        let descriptor: Descriptor = self.manager.descriptor()?;
        let config = Arc::new(descriptor.configuration(&self.registry)?);

        let builder = match &descriptor.features_path {
            Some(path) => ContextBuilder::from_path(path),
            None => ContextBuilder::create(),
        };
        let context = Arc::new(builder.with_config(config.clone()).build()?);

        debug!(
            reader = config.reader_id(),
            observer = config.observer_id(),
            features = context.size(),
            "Feature service built"
        );

        Ok(FeatureService {
            config,
            context,
            features_path: descriptor.features_path,
        })
    }
}

impl Default for FeatureServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_without_descriptor_fails() {
        assert!(matches!(
            FeatureService::builder().build(),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_features_file_loaded_and_reloaded() {
        let mut features = tempfile::NamedTempFile::new().unwrap();
        writeln!(features, "alpha=on").unwrap();

        let service = FeatureService::builder()
            .with_defaults()
            .add_str(
                format!("{}={}", FEATURES_PATH_KEY, features.path().display()),
                FileFormat::Properties,
            )
            .build()
            .unwrap();
        assert!(service.context().has_feature("alpha"));

        let mut file = std::fs::File::create(features.path()).unwrap();
        writeln!(file, "beta=off").unwrap();
        drop(file);

        assert_eq!(service.reload().unwrap(), 1);
        assert!(!service.context().has_feature("alpha"));
        assert!(service.context().has_feature("beta"));
    }

    #[test]
    fn test_reload_without_path() {
        let service = FeatureService::builder().with_defaults().build().unwrap();
        assert!(matches!(service.reload(), Err(ConfigError::KeyNotFound(_))));
    }
}
