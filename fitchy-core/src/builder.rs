//! Context builder
//!
//! Builds a [`FeatureContext`] from an optional feature source, using the
//! reader strategy of the chosen configuration.
//!
//! ```
//! use fitchy_core::ContextBuilder;
//!
//! let context = ContextBuilder::from_stream(std::io::Cursor::new("beta=on\nlegacy=off\n"))
//!     .build()
//!     .unwrap();
//!
//! assert!(context.has_feature("beta"));
//! assert_eq!(context.size(), 2);
//! ```

use crate::configuration::Configuration;
use crate::context::FeatureContext;
use crate::error::Result;
use crate::global;
use crate::reader::FeatureSource;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

enum Source {
    Empty,
    Stream(FeatureSource),
    Path(PathBuf),
}

/// Builder for [`FeatureContext`]
pub struct ContextBuilder {
    config: Option<Arc<Configuration>>,
    source: Source,
}

impl ContextBuilder {
    /// Builder for an empty context
    pub fn create() -> Self {
        Self {
            config: None,
            source: Source::Empty,
        }
    }

    /// Builder that loads features from a stream
    pub fn from_stream<R: Read + Send + 'static>(source: R) -> Self {
        Self {
            config: None,
            source: Source::Stream(Box::new(source)),
        }
    }

    /// Builder that loads features from a file.
    ///
    /// A missing or unreadable file yields an empty context.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            config: None,
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Use this configuration instead of the global one
    pub fn with_config(mut self, config: Arc<Configuration>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<FeatureContext> {
        let config = self.config.unwrap_or_else(global::configuration);
        let context = FeatureContext::new(config.clone());

        let source: FeatureSource = match self.source {
            Source::Empty => return Ok(context),
            Source::Stream(source) => source,
            Source::Path(path) => match File::open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "Loading features from file");
                    Box::new(file)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Feature file not readable, starting empty");
                    return Ok(context);
                }
            },
        };

        let mut reader = config.reader().create(Some(source), config.clone());
        context.load(reader.as_mut())?;
        Ok(context)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ConfigurationBuilder;
    use crate::error::FitchyError;
    use crate::status::DefaultFeatureStatus;
    use std::io::{Cursor, Write};

    fn config() -> Arc<Configuration> {
        Arc::new(ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build())
    }

    #[test]
    fn test_create_is_empty() {
        let context = ContextBuilder::create().with_config(config()).build().unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn test_from_stream_uses_given_config() {
        let config = config();
        let context = ContextBuilder::from_stream(Cursor::new("a=on\nb=off"))
            .with_config(config.clone())
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(context.config(), &config));
        assert!(context.feature_has_status("b", config.disabled_status().unwrap()).unwrap());
    }

    #[test]
    fn test_from_stream_surfaces_format_errors() {
        let result = ContextBuilder::from_stream(Cursor::new("a=maybe"))
            .with_config(config())
            .build();
        assert!(matches!(result, Err(FitchyError::StatusNotFound(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# features").unwrap();
        writeln!(file, "checkout.v2=on").unwrap();

        let context = ContextBuilder::from_path(file.path())
            .with_config(config())
            .build()
            .unwrap();
        assert!(context.has_feature("checkout.v2"));
    }

    #[test]
    fn test_missing_path_yields_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let context = ContextBuilder::from_path(dir.path().join("missing.properties"))
            .with_config(config())
            .build()
            .unwrap();
        assert!(context.is_empty());
    }
}
