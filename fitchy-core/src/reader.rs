//! Feature Readers
//!
//! A [`FeatureReader`] yields [`Feature`] entries from a source one at a time.
//! Readers are created by a [`ReaderFactory`], the strategy a
//! [`Configuration`] names under `fitchy.feature.reader`.
//!
//! The built-in [`PropertyFeatureReader`] reads `name=status` lines, where the
//! status is a system name from the configuration's status set:
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::{Configuration, FeatureReader, PropertyFeatureReader};
//!
//! let config = Arc::new(Configuration::default_config().unwrap());
//! let mut reader: Box<dyn FeatureReader> = Box::new(PropertyFeatureReader::from_content(
//!     "checkout.v2=on\nsearch=off\n",
//!     config,
//! ));
//!
//! let names: Vec<String> = reader
//!     .features()
//!     .map(|feature| feature.unwrap().name().to_string())
//!     .collect();
//!
//! assert_eq!(names, vec!["checkout.v2", "search"]);
//! ```

use crate::configuration::Configuration;
use crate::error::{FitchyError, Result};
use crate::feature::Feature;
use std::io::Read;
use std::sync::Arc;
use tracing::trace;

/// A readable feature source handed to a reader factory.
pub type FeatureSource = Box<dyn Read + Send>;

/// Identifier of [`PropertyReaderFactory`].
pub const PROPERTIES_READER_ID: &str = "properties";

/// Sequential source of features
pub trait FeatureReader: Send {
    /// Next feature, or `None` once the source is exhausted.
    fn read(&mut self) -> Result<Option<Feature>>;

    /// Release the underlying source. Reading after close yields `None`.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<'r> dyn FeatureReader + 'r {
    /// Iterate the remaining features. Iteration stops after the first error.
    pub fn features(&mut self) -> Features<'_, 'r> {
        Features {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over the remaining features of a reader
pub struct Features<'a, 'r> {
    reader: &'a mut (dyn FeatureReader + 'r),
    done: bool,
}

impl Iterator for Features<'_, '_> {
    type Item = Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read() {
            Ok(Some(feature)) => Some(Ok(feature)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Creates readers over a source for a given configuration
pub trait ReaderFactory: Send + Sync {
    /// Identifier used in configuration descriptors
    fn id(&self) -> &str;

    /// Create a reader. Creation never fails; an unusable source is reported
    /// by the first `read`.
    fn create(&self, source: Option<FeatureSource>, config: Arc<Configuration>) -> Box<dyn FeatureReader>;
}

/// Factory for [`PropertyFeatureReader`], registered as `properties`
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyReaderFactory;

impl ReaderFactory for PropertyReaderFactory {
    fn id(&self) -> &str {
        PROPERTIES_READER_ID
    }

    fn create(&self, source: Option<FeatureSource>, config: Arc<Configuration>) -> Box<dyn FeatureReader> {
        Box::new(PropertyFeatureReader::new(source, config))
    }
}

enum Entries {
    Pending(Option<FeatureSource>),
    Ready(std::vec::IntoIter<(String, String)>),
    Failed(String),
    Closed,
}

/// Reads `name=status` properties into features.
///
/// The source is consumed on the first `read`. A missing source, an IO
/// failure or non UTF-8 content fail that read with
/// [`FitchyError::UnsupportedFormat`]; an unknown status system name fails it
/// with [`FitchyError::StatusNotFound`].
pub struct PropertyFeatureReader {
    config: Arc<Configuration>,
    entries: Entries,
}

impl PropertyFeatureReader {
    pub fn new(source: Option<FeatureSource>, config: Arc<Configuration>) -> Self {
        Self {
            config,
            entries: Entries::Pending(source),
        }
    }

    /// Reader over in-memory properties text
    pub fn from_content(content: &str, config: Arc<Configuration>) -> Self {
        let entries = crate::properties::Properties::parse(content).into_entries();
        Self {
            config,
            entries: Entries::Ready(entries.into_iter()),
        }
    }

    fn load(source: Option<FeatureSource>) -> Entries {
        let Some(mut source) = source else {
            return Entries::Failed("no feature source supplied".to_string());
        };

        let mut content = String::new();
        match source.read_to_string(&mut content) {
            Ok(_) => {
                let entries = crate::properties::Properties::parse(&content).into_entries();
                trace!(entries = entries.len(), "Loaded feature properties");
                Entries::Ready(entries.into_iter())
            }
            Err(e) => Entries::Failed(format!("unable to read feature properties: {}", e)),
        }
    }
}

impl FeatureReader for PropertyFeatureReader {
    fn read(&mut self) -> Result<Option<Feature>> {
        if let Entries::Pending(source) = &mut self.entries {
            let source = source.take();
            self.entries = Self::load(source);
        }

        match &mut self.entries {
            Entries::Ready(entries) => match entries.next() {
                Some((name, system_name)) => {
                    let status = self.config.status_of(&system_name)?;
                    Ok(Some(Feature::new(name, status)))
                }
                None => Ok(None),
            },
            Entries::Failed(reason) => Err(FitchyError::UnsupportedFormat(reason.clone())),
            Entries::Pending(_) | Entries::Closed => Ok(None),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.entries = Entries::Closed;
        Ok(())
    }
}
