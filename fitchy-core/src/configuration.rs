//! Configuration
//!
//! A [`Configuration`] fixes the status set, the canonical enabled and
//! disabled statuses, and the reader and interceptor strategies. It is built
//! once and shared as `Arc<Configuration>`.
//!
//! ```
//! use fitchy_core::{ConfigurationBuilder, DefaultFeatureStatus};
//!
//! let config = ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build();
//!
//! assert_eq!(config.enabled_status().unwrap().system_name(), "on");
//! assert_eq!(config.disabled_status().unwrap().system_name(), "off");
//! assert_eq!(config.reader_id(), "properties");
//! assert_eq!(config.observer_id(), "proxy");
//! ```

use crate::error::{FitchyError, Result};
use crate::interceptor::{Interceptor, ProxyInterceptor};
use crate::properties::Properties;
use crate::reader::{PropertyReaderFactory, ReaderFactory};
use crate::registry::ComponentRegistry;
use crate::status::{FeatureStatus, StatusKind, StatusSet};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Descriptor key naming the status set.
pub const STATUS_KEY: &str = "fitchy.feature.status";
/// Descriptor key naming the feature reader.
pub const READER_KEY: &str = "fitchy.feature.reader";
/// Descriptor key naming the interceptor strategy.
pub const OBSERVER_KEY: &str = "fitchy.proxy.observer";

const DEFAULT_CONFIGURATION: &str = include_str!("../resources/default-configuration.properties");

/// Process settings for feature resolution
pub struct Configuration {
    statuses: StatusSet,
    enabled_status: Option<FeatureStatus>,
    disabled_status: Option<FeatureStatus>,
    reader: Arc<dyn ReaderFactory>,
    interceptor: Arc<dyn Interceptor>,
}

impl Configuration {
    /// Start a builder for an explicit status set
    pub fn builder(statuses: StatusSet) -> ConfigurationBuilder {
        ConfigurationBuilder::from_status_set(statuses)
    }

    /// Build the built-in configuration (`DefaultFeatureStatus`, properties
    /// reader, proxy interceptor).
    pub fn default_config() -> Result<Self> {
        let registry = ComponentRegistry::new();
        let properties = Properties::parse(DEFAULT_CONFIGURATION);
        Ok(ConfigurationBuilder::from_properties(&properties, &registry)?.build())
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn enabled_status(&self) -> Option<&FeatureStatus> {
        self.enabled_status.as_ref()
    }

    pub fn disabled_status(&self) -> Option<&FeatureStatus> {
        self.disabled_status.as_ref()
    }

    /// Look up a status by its system name.
    ///
    /// When several statuses share the system name the last one wins. An
    /// unknown name is an error; there is no fallback to the disabled status.
    pub fn status_of(&self, system_name: &str) -> Result<FeatureStatus> {
        self.statuses
            .iter()
            .filter(|status| status.system_name() == system_name)
            .last()
            .cloned()
            .ok_or_else(|| {
                FitchyError::StatusNotFound(format!(
                    "status with name '{}' not found",
                    system_name
                ))
            })
    }

    /// Look up a status by its own identifier (e.g. `ON`).
    ///
    /// Unlike [`status_of`](Self::status_of) a miss is not an error.
    pub fn status_of_name(&self, name: &str) -> Option<FeatureStatus> {
        self.statuses
            .iter()
            .filter(|status| status.name() == name)
            .last()
            .cloned()
    }

    pub fn reader(&self) -> &Arc<dyn ReaderFactory> {
        &self.reader
    }

    pub fn interceptor(&self) -> &Arc<dyn Interceptor> {
        &self.interceptor
    }

    pub fn reader_id(&self) -> &str {
        self.reader.id()
    }

    pub fn observer_id(&self) -> &str {
        self.interceptor.id()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("statuses", &self.statuses)
            .field("enabled_status", &self.enabled_status)
            .field("disabled_status", &self.disabled_status)
            .field("reader", &self.reader.id())
            .field("interceptor", &self.interceptor.id())
            .finish()
    }
}

/// Builder for [`Configuration`]
pub struct ConfigurationBuilder {
    statuses: StatusSet,
    reader: Arc<dyn ReaderFactory>,
    interceptor: Arc<dyn Interceptor>,
}

impl ConfigurationBuilder {
    /// Builder over every variant of a status kind, with the properties
    /// reader and the proxy interceptor as defaults.
    pub fn from_status<K: StatusKind>() -> Self {
        Self::from_status_set(StatusSet::of::<K>())
    }

    pub fn from_status_set(statuses: StatusSet) -> Self {
        Self {
            statuses,
            reader: Arc::new(PropertyReaderFactory),
            interceptor: Arc::new(ProxyInterceptor),
        }
    }

    /// Builder from a parsed configuration descriptor.
    ///
    /// All three identifiers (`fitchy.feature.status`, `fitchy.feature.reader`,
    /// `fitchy.proxy.observer`) are required and resolved through `registry`.
    pub fn from_properties(properties: &Properties, registry: &ComponentRegistry) -> Result<Self> {
        let status_id = required(properties, STATUS_KEY)?;
        let reader_id = required(properties, READER_KEY)?;
        let observer_id = required(properties, OBSERVER_KEY)?;

        let statuses = registry.status_set(status_id).cloned().ok_or_else(|| {
            FitchyError::ConfigurationBuild(format!("unknown status set '{}'", status_id))
        })?;
        let reader = registry.reader(reader_id).ok_or_else(|| {
            FitchyError::ConfigurationBuild(format!("unknown feature reader '{}'", reader_id))
        })?;
        let interceptor = registry.interceptor(observer_id).ok_or_else(|| {
            FitchyError::ConfigurationBuild(format!("unknown observer '{}'", observer_id))
        })?;

        debug!(
            status = status_id,
            reader = reader_id,
            observer = observer_id,
            "Resolved configuration descriptor"
        );

        Ok(Self {
            statuses,
            reader,
            interceptor,
        })
    }

    /// Builder from properties text read from a stream.
    pub fn from_stream<R: Read>(mut source: R, registry: &ComponentRegistry) -> Result<Self> {
        let mut content = String::new();
        source.read_to_string(&mut content).map_err(|e| {
            FitchyError::ConfigurationBuild(format!("unable to read configuration source: {}", e))
        })?;

        Self::from_properties(&Properties::parse(&content), registry)
    }

    /// Set the reader strategy
    pub fn with_reader(mut self, reader: Arc<dyn ReaderFactory>) -> Self {
        self.reader = reader;
        self
    }

    /// Set the interceptor strategy
    pub fn with_observer(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = interceptor;
        self
    }

    pub fn build(self) -> Configuration {
        let mut enabled_status = None;
        let mut disabled_status = None;

        // Later matches replace earlier ones.
        for status in &self.statuses {
            if status.is_enabled() {
                enabled_status = Some(status.clone());
            } else if status.is_disabled() {
                disabled_status = Some(status.clone());
            }
        }

        debug!(
            statuses = self.statuses.len(),
            enabled = ?enabled_status.as_ref().map(|s| s.system_name()),
            disabled = ?disabled_status.as_ref().map(|s| s.system_name()),
            "Configuration built"
        );

        Configuration {
            statuses: self.statuses,
            enabled_status,
            disabled_status,
            reader: self.reader,
            interceptor: self.interceptor,
        }
    }
}

fn required<'a>(properties: &'a Properties, key: &str) -> Result<&'a str> {
    properties
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .map(str::trim)
        .ok_or_else(|| FitchyError::ConfigurationBuild(format!("missing '{}'", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::SubclassInterceptor;
    use crate::status::{DefaultFeatureStatus, Polarity};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum DoubleEnabled {
        First,
        Second,
        Off,
    }

    impl StatusKind for DoubleEnabled {
        const ALL: &'static [Self] = &[Self::First, Self::Second, Self::Off];

        fn name(&self) -> &'static str {
            match self {
                Self::First => "FIRST",
                Self::Second => "SECOND",
                Self::Off => "OFF",
            }
        }

        fn system_name(&self) -> &'static str {
            match self {
                Self::First => "first",
                Self::Second => "second",
                Self::Off => "off",
            }
        }

        fn polarity(&self) -> Polarity {
            match self {
                Self::Off => Polarity::Disabled,
                _ => Polarity::Enabled,
            }
        }
    }

    #[test]
    fn test_from_status_defaults() {
        let config = ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build();

        assert!(config.enabled_status().unwrap().is(DefaultFeatureStatus::On));
        assert!(config.disabled_status().unwrap().is(DefaultFeatureStatus::Off));
        assert_eq!(config.reader_id(), "properties");
        assert_eq!(config.observer_id(), "proxy");
    }

    #[test]
    fn test_last_enabled_variant_wins() {
        let config = ConfigurationBuilder::from_status::<DoubleEnabled>().build();
        assert!(config.enabled_status().unwrap().is(DoubleEnabled::Second));
        assert!(config.disabled_status().unwrap().is(DoubleEnabled::Off));
    }

    #[test]
    fn test_status_of() {
        let config = ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build();

        assert!(config.status_of("off").unwrap().is(DefaultFeatureStatus::Off));
        assert!(matches!(
            config.status_of("OFF"),
            Err(FitchyError::StatusNotFound(_))
        ));
    }

    #[test]
    fn test_status_of_name_returns_none() {
        let config = ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build();

        assert!(config.status_of_name("ON").unwrap().is(DefaultFeatureStatus::On));
        assert!(config.status_of_name("on").is_none());
    }

    #[test]
    fn test_status_set_without_enabled() {
        let statuses = StatusSet::builder()
            .neutral("HIDDEN", "hidden")
            .disabled("OFF", "off")
            .build()
            .unwrap();
        let config = Configuration::builder(statuses).build();

        assert!(config.enabled_status().is_none());
        assert_eq!(config.disabled_status().unwrap().system_name(), "off");
    }

    #[test]
    fn test_with_observer() {
        let config = ConfigurationBuilder::from_status::<DefaultFeatureStatus>()
            .with_observer(Arc::new(SubclassInterceptor))
            .build();
        assert_eq!(config.observer_id(), "subclass");
    }

    #[test]
    fn test_default_config() {
        let config = Configuration::default_config().unwrap();
        assert!(config.enabled_status().unwrap().is(DefaultFeatureStatus::On));
        assert_eq!(config.observer_id(), "proxy");
    }

    #[test]
    fn test_from_properties_missing_key() {
        let registry = ComponentRegistry::new();
        let properties = Properties::parse("fitchy.feature.status=fitchy_core::DefaultFeatureStatus");

        let result = ConfigurationBuilder::from_properties(&properties, &registry);
        assert!(matches!(result, Err(FitchyError::ConfigurationBuild(msg)) if msg.contains(READER_KEY)));
    }

    #[test]
    fn test_from_properties_unknown_identifier() {
        let registry = ComponentRegistry::new();
        let properties = Properties::parse(
            "fitchy.feature.status=fitchy_core::DefaultFeatureStatus\n\
             fitchy.feature.reader=properties\n\
             fitchy.proxy.observer=cglib\n",
        );

        let result = ConfigurationBuilder::from_properties(&properties, &registry);
        assert!(matches!(result, Err(FitchyError::ConfigurationBuild(msg)) if msg.contains("cglib")));
    }

    #[test]
    fn test_from_stream() {
        let registry = ComponentRegistry::new();
        let source = "fitchy.feature.status=fitchy_core::DefaultFeatureStatus\n\
                      fitchy.feature.reader=properties\n\
                      fitchy.proxy.observer=subclass\n";

        let config = ConfigurationBuilder::from_stream(source.as_bytes(), &registry)
            .unwrap()
            .build();
        assert_eq!(config.observer_id(), "subclass");
    }
}
