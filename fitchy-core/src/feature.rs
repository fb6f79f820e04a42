// Feature entries held by a feature context

use crate::status::FeatureStatus;

/// A feature name bound to a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    name: String,
    status: FeatureStatus,
}

impl Feature {
    pub fn new(name: impl Into<String>, status: FeatureStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &FeatureStatus {
        &self.status
    }

    /// Check whether the feature carries exactly this status (identity comparison).
    pub fn has_status(&self, status: &FeatureStatus) -> bool {
        self.status == *status
    }
}

/// Argument accepted by [`FeatureContext::add_feature`](crate::FeatureContext::add_feature).
///
/// A bare name always registers the feature with the configuration's enabled
/// status; a [`Feature`] keeps the status it carries.
#[derive(Debug, Clone)]
pub enum NewFeature {
    Named(String),
    Entry(Feature),
}

impl From<&str> for NewFeature {
    fn from(name: &str) -> Self {
        NewFeature::Named(name.to_string())
    }
}

impl From<String> for NewFeature {
    fn from(name: String) -> Self {
        NewFeature::Named(name)
    }
}

impl From<&String> for NewFeature {
    fn from(name: &String) -> Self {
        NewFeature::Named(name.clone())
    }
}

impl From<Feature> for NewFeature {
    fn from(feature: Feature) -> Self {
        NewFeature::Entry(feature)
    }
}
