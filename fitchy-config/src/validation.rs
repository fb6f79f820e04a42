// Descriptor validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Validation rules shared by descriptor types
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is present and not blank
    pub fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
        let value = value.ok_or_else(|| ConfigError::KeyNotFound(field.to_string()))?;
        Self::not_empty(value, field)?;
        Ok(value)
    }

    /// Validate that a value is not blank
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }
}
