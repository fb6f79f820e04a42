//! Feature resolution
//!
//! Decides whether a switched operation is available:
//!
//! 1. no switch: not available
//! 2. the required status is the switch's explicit status, or the
//!    configuration's enabled status when none is given
//! 3. the status name is resolved with [`Configuration::status_of`]
//! 4. the feature must be registered with exactly that status
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::{Configuration, FeatureContext, FeatureResolver, FeatureSwitch};
//!
//! let context = Arc::new(FeatureContext::new(Arc::new(Configuration::default_config().unwrap())));
//! context.add_feature("beta").unwrap();
//!
//! let resolver = FeatureResolver::new(context);
//! assert!(resolver.is_feature_available(Some(&FeatureSwitch::new("beta"))).unwrap());
//! assert!(!resolver.is_feature_available(Some(&FeatureSwitch::new("beta").with_status("off"))).unwrap());
//! assert!(!resolver.is_feature_available(None).unwrap());
//! ```

use crate::configuration::Configuration;
use crate::context::FeatureContext;
use crate::error::{FitchyError, Result};
use crate::switch::FeatureSwitch;
use std::sync::Arc;

/// Answers availability questions against one context
#[derive(Debug, Clone)]
pub struct FeatureResolver {
    context: Arc<FeatureContext>,
    config: Arc<Configuration>,
}

impl FeatureResolver {
    /// Resolver using the context's own configuration
    pub fn new(context: Arc<FeatureContext>) -> Self {
        let config = context.config().clone();
        Self { context, config }
    }

    /// Resolver resolving status names against `config`
    pub fn with_config(context: Arc<FeatureContext>, config: Arc<Configuration>) -> Self {
        Self { context, config }
    }

    pub fn context(&self) -> &Arc<FeatureContext> {
        &self.context
    }

    pub fn is_feature_available(&self, switch: Option<&FeatureSwitch>) -> Result<bool> {
        let Some(switch) = switch else {
            return Ok(false);
        };

        let status_name = if switch.has_explicit_status() {
            switch.status()
        } else {
            self.config
                .enabled_status()
                .map(|status| status.system_name())
                .ok_or_else(|| {
                    FitchyError::StatusNotFound("configuration has no enabled status".to_string())
                })?
        };

        let status = self.config.status_of(status_name)?;
        self.context.feature_has_status(switch.value(), &status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigurationBuilder;
    use crate::feature::Feature;
    use crate::status::{DefaultFeatureStatus, StatusSet};

    fn context() -> Arc<FeatureContext> {
        Arc::new(FeatureContext::new(Arc::new(
            ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build(),
        )))
    }

    #[test]
    fn test_absent_switch_is_unavailable() {
        assert!(!FeatureResolver::new(context()).is_feature_available(None).unwrap());
    }

    #[test]
    fn test_unregistered_feature_is_unavailable() {
        let resolver = FeatureResolver::new(context());
        assert!(!resolver.is_feature_available(Some(&FeatureSwitch::new("ghost"))).unwrap());
    }

    #[test]
    fn test_explicit_status() {
        let context = context();
        let off = context.config().disabled_status().unwrap().clone();
        context.add_feature(Feature::new("legacy", off)).unwrap();

        let resolver = FeatureResolver::new(context);
        assert!(!resolver.is_feature_available(Some(&FeatureSwitch::new("legacy"))).unwrap());
        assert!(resolver
            .is_feature_available(Some(&FeatureSwitch::new("legacy").with_status("off")))
            .unwrap());
    }

    #[test]
    fn test_unknown_status_fails() {
        let context = context();
        context.add_feature("x").unwrap();

        let resolver = FeatureResolver::new(context);
        let result = resolver.is_feature_available(Some(&FeatureSwitch::new("x").with_status("maybe")));
        assert!(matches!(result, Err(FitchyError::StatusNotFound(_))));
    }

    #[test]
    fn test_empty_value_fails() {
        let resolver = FeatureResolver::new(context());
        let result = resolver.is_feature_available(Some(&FeatureSwitch::new("")));
        assert!(matches!(result, Err(FitchyError::InvalidArgument(_))));
    }

    #[test]
    fn test_no_enabled_status_fails() {
        let statuses = StatusSet::builder().disabled("OFF", "off").build().unwrap();
        let context = Arc::new(FeatureContext::new(Arc::new(Configuration::builder(statuses).build())));

        let result = FeatureResolver::new(context).is_feature_available(Some(&FeatureSwitch::new("x")));
        assert!(matches!(result, Err(FitchyError::StatusNotFound(_))));
    }

    #[test]
    fn test_idempotent() {
        let context = context();
        context.add_feature("x").unwrap();
        let resolver = FeatureResolver::new(context);
        let switch = FeatureSwitch::new("x");

        let first = resolver.is_feature_available(Some(&switch)).unwrap();
        let second = resolver.is_feature_available(Some(&switch)).unwrap();
        assert_eq!(first, second);
    }
}
