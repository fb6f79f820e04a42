//! Component Registry
//!
//! Maps the identifiers used in configuration descriptors to status sets,
//! reader factories and interceptor strategies. [`ComponentRegistry::new`]
//! comes with the built-ins; applications register their own status kinds
//! under an identifier of their choosing.
//!
//! ```
//! use fitchy_core::{ComponentRegistry, DefaultFeatureStatus, DEFAULT_STATUS_ID};
//!
//! let registry = ComponentRegistry::new();
//!
//! assert!(registry.status_set(DEFAULT_STATUS_ID).is_some());
//! assert!(registry.reader("properties").is_some());
//! assert!(registry.interceptor("subclass").is_some());
//! assert!(registry.interceptor("cglib").is_none());
//! ```

use crate::interceptor::{Interceptor, ProxyInterceptor, SubclassInterceptor};
use crate::reader::{PropertyReaderFactory, ReaderFactory};
use crate::status::{DefaultFeatureStatus, StatusKind, StatusSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of the built-in [`DefaultFeatureStatus`] set.
pub const DEFAULT_STATUS_ID: &str = "fitchy_core::DefaultFeatureStatus";

/// Lookup table for the strategies a descriptor may name
#[derive(Clone)]
pub struct ComponentRegistry {
    statuses: HashMap<String, StatusSet>,
    readers: HashMap<String, Arc<dyn ReaderFactory>>,
    interceptors: HashMap<String, Arc<dyn Interceptor>>,
}

impl ComponentRegistry {
    /// Registry with the built-in status set, reader and interceptors.
    pub fn new() -> Self {
        Self::empty()
            .with_status::<DefaultFeatureStatus>(DEFAULT_STATUS_ID)
            .with_reader(Arc::new(PropertyReaderFactory))
            .with_interceptor(Arc::new(ProxyInterceptor))
            .with_interceptor(Arc::new(SubclassInterceptor))
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            statuses: HashMap::new(),
            readers: HashMap::new(),
            interceptors: HashMap::new(),
        }
    }

    /// Register every variant of a status kind under `id`.
    pub fn with_status<K: StatusKind>(self, id: impl Into<String>) -> Self {
        self.with_status_set(id, StatusSet::of::<K>())
    }

    /// Register a prebuilt status set under `id`.
    ///
    /// The set keeps its identity, so statuses resolved through the registry
    /// compare equal to the ones held by the caller.
    pub fn with_status_set(mut self, id: impl Into<String>, statuses: StatusSet) -> Self {
        self.statuses.insert(id.into(), statuses);
        self
    }

    /// Register a reader factory under its own id
    pub fn with_reader(mut self, reader: Arc<dyn ReaderFactory>) -> Self {
        self.readers.insert(reader.id().to_string(), reader);
        self
    }

    /// Register an interceptor under its own id
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors
            .insert(interceptor.id().to_string(), interceptor);
        self
    }

    pub fn status_set(&self, id: &str) -> Option<&StatusSet> {
        self.statuses.get(id)
    }

    pub fn reader(&self, id: &str) -> Option<Arc<dyn ReaderFactory>> {
        self.readers.get(id).cloned()
    }

    pub fn interceptor(&self, id: &str) -> Option<Arc<dyn Interceptor>> {
        self.interceptors.get(id).cloned()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut statuses: Vec<_> = self.statuses.keys().collect();
        let mut readers: Vec<_> = self.readers.keys().collect();
        let mut interceptors: Vec<_> = self.interceptors.keys().collect();
        statuses.sort();
        readers.sort();
        interceptors.sort();

        f.debug_struct("ComponentRegistry")
            .field("statuses", &statuses)
            .field("readers", &readers)
            .field("interceptors", &interceptors)
            .finish()
    }
}
