// Error types for the feature-resolution core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitchyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Feature already exists: {0}")]
    FeatureAlreadyExists(String),

    #[error("Status not found: {0}")]
    StatusNotFound(String),

    #[error("Unable to build configuration: {0}")]
    ConfigurationBuild(String),

    #[error("Unsupported feature source format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FitchyError {
    /// Fails with [`FitchyError::InvalidArgument`] when `value` is empty after trimming.
    pub(crate) fn require_non_empty(value: &str, message: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(FitchyError::InvalidArgument(message.to_string()));
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, FitchyError>;
