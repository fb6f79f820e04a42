// Feature switches: per-operation feature requirements

use std::collections::HashMap;

/// Marks an operation as switched by a feature.
///
/// `value` names the feature. `status` is the system name of the required
/// status; empty means the configuration's enabled status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSwitch {
    value: String,
    status: String,
}

impl FeatureSwitch {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: String::new(),
        }
    }

    /// Require a specific status instead of the enabled one
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn has_explicit_status(&self) -> bool {
        !self.status.is_empty()
    }
}

impl From<&str> for FeatureSwitch {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FeatureSwitch {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Operation id to switch table
///
/// ```
/// use fitchy_core::{FeatureSwitch, SwitchTable};
///
/// let switches = SwitchTable::new()
///     .switch("greet", "greeting.feature")
///     .switch("farewell", FeatureSwitch::new("greeting.feature").with_status("off"));
///
/// assert_eq!(switches.get("greet").unwrap().value(), "greeting.feature");
/// assert_eq!(switches.get("farewell").unwrap().status(), "off");
/// assert!(switches.get("wave").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchTable {
    switches: HashMap<&'static str, FeatureSwitch>,
}

impl SwitchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a switch for `operation`, replacing any previous one
    pub fn switch(mut self, operation: &'static str, switch: impl Into<FeatureSwitch>) -> Self {
        self.insert(operation, switch);
        self
    }

    pub fn insert(
        &mut self,
        operation: &'static str,
        switch: impl Into<FeatureSwitch>,
    ) -> Option<FeatureSwitch> {
        self.switches.insert(operation, switch.into())
    }

    pub fn get(&self, operation: &str) -> Option<&FeatureSwitch> {
        self.switches.get(operation)
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.switches.contains_key(operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureSwitch)> {
        self.switches.iter().map(|(op, switch)| (*op, switch))
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }
}
