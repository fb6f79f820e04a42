//! Feature Context
//!
//! The [`FeatureContext`] is the registry of features for one configuration.
//! A name maps to at most one [`Feature`]. Writers are serialized by a
//! `parking_lot::RwLock`; lookups take the shared lock.
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::{Configuration, Feature, FeatureContext};
//!
//! let config = Arc::new(Configuration::default_config().unwrap());
//! let context = FeatureContext::new(config.clone());
//!
//! context.add_feature("checkout.v2").unwrap();
//!
//! let off = config.disabled_status().unwrap().clone();
//! context.add_feature(Feature::new("search", off.clone())).unwrap();
//!
//! assert!(context.has_feature("checkout.v2"));
//! assert!(context.feature_has_status("search", &off).unwrap());
//! assert_eq!(context.size(), 2);
//! ```

use crate::configuration::Configuration;
use crate::error::{FitchyError, Result};
use crate::feature::{Feature, NewFeature};
use crate::reader::FeatureReader;
use crate::status::FeatureStatus;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Registry of features bound to one configuration
pub struct FeatureContext {
    features: RwLock<HashMap<String, Feature>>,
    config: Arc<Configuration>,
}

impl FeatureContext {
    /// Create an empty context
    pub fn new(config: Arc<Configuration>) -> Self {
        debug!("Creating new feature context");
        Self {
            features: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    /// Register a feature.
    ///
    /// A bare name is registered with the configuration's enabled status; a
    /// [`Feature`] keeps its own status. Fails with
    /// [`FitchyError::FeatureAlreadyExists`] when the name is taken, leaving
    /// the registry unchanged.
    pub fn add_feature(&self, feature: impl Into<NewFeature>) -> Result<Feature> {
        let feature = match feature.into() {
            NewFeature::Named(name) => {
                FitchyError::require_non_empty(&name, "feature name is required")?;
                let status = self.config.enabled_status().cloned().ok_or_else(|| {
                    FitchyError::StatusNotFound(
                        "configuration has no enabled status".to_string(),
                    )
                })?;
                Feature::new(name, status)
            }
            NewFeature::Entry(feature) => {
                FitchyError::require_non_empty(feature.name(), "feature argument must carry a name")?;
                feature
            }
        };

        trace!(feature = feature.name(), "Acquiring write lock for registration");
        let mut features = self.features.write();
        match features.entry(feature.name().to_string()) {
            Entry::Occupied(_) => Err(FitchyError::FeatureAlreadyExists(format!(
                "feature '{}' already exists",
                feature.name()
            ))),
            Entry::Vacant(slot) => {
                debug!(
                    feature = feature.name(),
                    status = feature.status().system_name(),
                    "Feature registered"
                );
                slot.insert(feature.clone());
                Ok(feature)
            }
        }
    }

    /// Check whether a feature is registered. Never fails.
    pub fn has_feature(&self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let exists = self.features.read().contains_key(name);
        trace!(feature = name, exists = exists, "Checked feature existence");
        exists
    }

    /// Check whether a registered feature carries exactly `status`.
    ///
    /// Absent features yield `false`.
    pub fn feature_has_status(&self, name: &str, status: &FeatureStatus) -> Result<bool> {
        FitchyError::require_non_empty(name, "feature name is required")?;
        Ok(self
            .features
            .read()
            .get(name)
            .is_some_and(|feature| feature.has_status(status)))
    }

    pub fn feature(&self, name: &str) -> Option<Feature> {
        self.features.read().get(name).cloned()
    }

    /// Registered feature names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.features.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        let mut features = self.features.write();
        let count = features.len();
        features.clear();
        debug!(feature_count = count, "Cleared all features from context");
    }

    pub fn size(&self) -> usize {
        self.features.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.read().is_empty()
    }

    /// Drain `reader` into the context and close it.
    ///
    /// Either every feature is registered or none is: a reader error or a
    /// duplicate name leaves the context unchanged.
    pub fn load(&self, reader: &mut dyn FeatureReader) -> Result<usize> {
        let staged = Self::drain(reader)?;

        let mut features = self.features.write();
        if let Some(name) = staged.keys().find(|name| features.contains_key(*name)) {
            return Err(FitchyError::FeatureAlreadyExists(format!(
                "feature '{}' already exists",
                name
            )));
        }

        let count = staged.len();
        features.extend(staged);
        debug!(loaded = count, total = features.len(), "Features loaded");
        Ok(count)
    }

    /// Replace the whole feature set with the contents of `reader`.
    ///
    /// The new set is staged before the write lock is taken, so concurrent
    /// lookups see either the previous set or the new one. On error the
    /// previous set stays in place.
    pub fn reload(&self, reader: &mut dyn FeatureReader) -> Result<usize> {
        let staged = Self::drain(reader)?;
        let count = staged.len();

        let previous = std::mem::replace(&mut *self.features.write(), staged);
        debug!(previous = previous.len(), loaded = count, "Features reloaded");
        Ok(count)
    }

    fn drain(reader: &mut dyn FeatureReader) -> Result<HashMap<String, Feature>> {
        let staged = Self::collect(reader);
        let closed = reader.close();
        let staged = staged?;
        closed?;
        Ok(staged)
    }

    fn collect(reader: &mut dyn FeatureReader) -> Result<HashMap<String, Feature>> {
        let mut staged = HashMap::new();
        for feature in reader.features() {
            let feature = feature?;
            FitchyError::require_non_empty(feature.name(), "feature name is required")?;
            match staged.entry(feature.name().to_string()) {
                Entry::Occupied(_) => {
                    return Err(FitchyError::FeatureAlreadyExists(format!(
                        "feature '{}' already exists",
                        feature.name()
                    )));
                }
                Entry::Vacant(slot) => {
                    trace!(feature = feature.name(), "Staged feature");
                    slot.insert(feature);
                }
            }
        }
        Ok(staged)
    }
}

impl fmt::Debug for FeatureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureContext")
            .field("features", &self.names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigurationBuilder;
    use crate::reader::PropertyFeatureReader;
    use crate::status::{DefaultFeatureStatus, StatusSet};

    fn config() -> Arc<Configuration> {
        Arc::new(ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build())
    }

    fn reader(content: &str, config: &Arc<Configuration>) -> PropertyFeatureReader {
        PropertyFeatureReader::from_content(content, config.clone())
    }

    #[test]
    fn test_empty_context() {
        let context = FeatureContext::new(config());
        assert_eq!(context.size(), 0);
        assert!(context.is_empty());
        assert!(!context.has_feature("anything"));
        assert!(!context.has_feature(""));
    }

    #[test]
    fn test_add_by_name_uses_enabled_status() {
        let config = config();
        let context = FeatureContext::new(config.clone());

        let feature = context.add_feature("x").unwrap();
        assert!(feature.status().is(DefaultFeatureStatus::On));
        assert!(context.has_feature("x"));
        assert!(context.feature_has_status("x", config.enabled_status().unwrap()).unwrap());
        assert!(!context.feature_has_status("x", config.disabled_status().unwrap()).unwrap());
    }

    #[test]
    fn test_add_entry_keeps_status() {
        let config = config();
        let context = FeatureContext::new(config.clone());
        let off = config.disabled_status().unwrap().clone();

        context.add_feature(Feature::new("y", off.clone())).unwrap();
        assert!(context.feature_has_status("y", &off).unwrap());
        assert_eq!(context.feature("y").unwrap().status(), &off);
    }

    #[test]
    fn test_duplicate_rejected() {
        let context = FeatureContext::new(config());
        context.add_feature("x").unwrap();

        assert!(matches!(
            context.add_feature("x"),
            Err(FitchyError::FeatureAlreadyExists(_))
        ));
        assert_eq!(context.size(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let context = FeatureContext::new(config());
        assert!(matches!(context.add_feature(""), Err(FitchyError::InvalidArgument(_))));
        assert!(matches!(context.add_feature("  "), Err(FitchyError::InvalidArgument(_))));
        assert!(matches!(
            context.feature_has_status("", config().enabled_status().unwrap()),
            Err(FitchyError::InvalidArgument(_))
        ));
        assert_eq!(context.size(), 0);
    }

    #[test]
    fn test_add_by_name_without_enabled_status() {
        let statuses = StatusSet::builder().disabled("OFF", "off").build().unwrap();
        let context = FeatureContext::new(Arc::new(Configuration::builder(statuses).build()));

        assert!(matches!(context.add_feature("x"), Err(FitchyError::StatusNotFound(_))));
    }

    #[test]
    fn test_absent_feature_has_no_status() {
        let config = config();
        let context = FeatureContext::new(config.clone());
        assert!(!context.feature_has_status("ghost", config.enabled_status().unwrap()).unwrap());
    }

    #[test]
    fn test_clear_and_names() {
        let context = FeatureContext::new(config());
        context.add_feature("b").unwrap();
        context.add_feature("a").unwrap();
        assert_eq!(context.names(), vec!["a", "b"]);

        context.clear();
        assert!(context.is_empty());
    }

    #[test]
    fn test_load() {
        let config = config();
        let context = FeatureContext::new(config.clone());

        let count = context.load(&mut reader("a=on\nb=off\n", &config)).unwrap();
        assert_eq!(count, 2);
        assert!(context.feature("b").unwrap().status().is(DefaultFeatureStatus::Off));
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let config = config();
        let context = FeatureContext::new(config.clone());
        context.add_feature("b").unwrap();

        let result = context.load(&mut reader("a=on\nb=off\n", &config));
        assert!(matches!(result, Err(FitchyError::FeatureAlreadyExists(_))));
        assert_eq!(context.names(), vec!["b"]);

        let result = context.load(&mut reader("c=on\nd=maybe\n", &config));
        assert!(matches!(result, Err(FitchyError::StatusNotFound(_))));
        assert_eq!(context.names(), vec!["b"]);
    }

    #[test]
    fn test_reload_replaces_set() {
        let config = config();
        let context = FeatureContext::new(config.clone());
        context.add_feature("old").unwrap();

        let count = context.reload(&mut reader("new=on", &config)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(context.names(), vec!["new"]);
    }

    #[test]
    fn test_reload_error_keeps_previous_set() {
        let config = config();
        let context = FeatureContext::new(config.clone());
        context.add_feature("old").unwrap();

        assert!(context.reload(&mut reader("new=maybe", &config)).is_err());
        assert_eq!(context.names(), vec!["old"]);
    }
}
