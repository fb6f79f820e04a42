// Environment variable loading

use crate::{ConfigError, Result};
use fitchy_core::Properties;
use std::collections::HashMap;
use std::env;

/// Default variable prefix
pub const ENV_PREFIX: &str = "FITCHY";

/// Environment variable loader
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load all prefixed variables, keyed by their lowercase remainder
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(env::vars()
            .filter_map(|(key, value)| self.strip(&key).map(|rest| (rest.to_lowercase(), value)))
            .collect())
    }

    /// Load prefixed variables as descriptor entries.
    ///
    /// With the default prefix `FITCHY_FEATURE_STATUS` becomes
    /// `fitchy.feature.status` and `FITCHY_FEATURES_PATH` becomes
    /// `fitchy.features.path`. Entries are always rooted at `fitchy.`,
    /// whatever the prefix.
    pub fn overrides(&self) -> Result<Properties> {
        let mut entries: Vec<(String, String)> = self
            .load()?
            .into_iter()
            .map(|(rest, value)| (format!("fitchy.{}", rest.replace('_', ".")), value))
            .collect();
        entries.sort();

        Ok(entries.into_iter().collect())
    }

    /// Load one variable, e.g. `load_var("feature_status")` reads
    /// `FITCHY_FEATURE_STATUS`
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = format!("{}_{}", self.prefix, key.to_uppercase());
        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn strip<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(ENV_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe under concurrent tests, so these use
    // variables that are guaranteed absent.

    #[test]
    fn test_load_var_or_default() {
        let loader = EnvLoader::new("FITCHY_UNIT_ABSENT");
        assert_eq!(loader.load_var_or("NONEXISTENT_12345", "default"), "default");
    }

    #[test]
    fn test_missing_var() {
        let loader = EnvLoader::default();
        assert!(matches!(
            loader.load_var("MISSING_VAR_67890"),
            Err(ConfigError::EnvError(_))
        ));
    }

    #[test]
    fn test_strip_requires_separator() {
        let loader = EnvLoader::default();
        assert_eq!(loader.strip("FITCHY_FEATURE_STATUS"), Some("FEATURE_STATUS"));
        assert_eq!(loader.strip("FITCHYFEATURE"), None);
        assert_eq!(loader.strip("FITCHY_"), None);
        assert_eq!(loader.strip("OTHER_FEATURE"), None);
    }

    #[test]
    fn test_unused_prefix_yields_no_overrides() {
        let loader = EnvLoader::new("FITCHY_UNIT_NOTHING_HERE");
        assert!(loader.overrides().unwrap().is_empty());
    }
}
