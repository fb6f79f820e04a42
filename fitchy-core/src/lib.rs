//! Feature toggles for Fitchy
//!
//! Operations are switched on and off by features registered in a
//! [`FeatureContext`]. Each feature carries a status from the configured
//! status set; a switched operation runs only while its feature carries the
//! required status.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::*;
//!
//! # fn main() -> fitchy_core::Result<()> {
//! let context = Arc::new(
//!     ContextBuilder::from_stream(std::io::Cursor::new("new.checkout=on\nold.search=off\n"))
//!         .build()?,
//! );
//!
//! let invoker = AnnotatedMethodInvoker::new(
//!     FeatureResolver::new(context.clone()),
//!     SwitchTable::new()
//!         .switch("checkout", "new.checkout")
//!         .switch("search", "old.search"),
//! );
//!
//! assert_eq!(invoker.invoke("checkout", || "v2")?, Some("v2"));
//! assert_eq!(invoker.invoke("search", || "v1")?, None);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Statuses
//!
//! Any fieldless enum implementing [`StatusKind`] can serve as the status
//! set, or one can be assembled at runtime with [`StatusSet::builder`]:
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::*;
//!
//! let statuses = StatusSet::builder()
//!     .enabled("ENABLED", "an")
//!     .neutral("HIDDEN", "versteckt")
//!     .disabled("DISABLED", "aus")
//!     .build()
//!     .unwrap();
//! let config = Arc::new(Configuration::builder(statuses).build());
//!
//! let context = FeatureContext::new(config.clone());
//! let hidden = config.status_of("versteckt").unwrap();
//! context.add_feature(Feature::new("preview", hidden.clone())).unwrap();
//!
//! assert!(context.feature_has_status("preview", &hidden).unwrap());
//! ```

pub mod builder;
pub mod checker;
pub mod configuration;
pub mod context;
pub mod error;
pub mod feature;
pub mod global;
pub mod interceptor;
pub mod invoker;
pub mod logging;
pub mod properties;
pub mod proxy;
pub mod reader;
pub mod registry;
pub mod resolver;
pub mod status;
pub mod switch;

pub use builder::ContextBuilder;
pub use checker::FeatureChecker;
pub use configuration::{
    Configuration, ConfigurationBuilder, OBSERVER_KEY, READER_KEY, STATUS_KEY,
};
pub use context::FeatureContext;
pub use error::{FitchyError, Result};
pub use feature::{Feature, NewFeature};
pub use interceptor::{
    Interceptor, Observable, PROXY_INTERCEPTOR_ID, ProxyInterceptor, SUBCLASS_INTERCEPTOR_ID,
    SubclassInterceptor, SwitchLookup,
};
pub use invoker::{AnnotatedMethodInvoker, Dispatch};
pub use properties::Properties;
pub use proxy::{Observed, ProxyBuilder, observe};
pub use reader::{
    FeatureReader, FeatureSource, Features, PROPERTIES_READER_ID, PropertyFeatureReader,
    PropertyReaderFactory, ReaderFactory,
};
pub use registry::{ComponentRegistry, DEFAULT_STATUS_ID};
pub use resolver::FeatureResolver;
pub use status::{
    DefaultFeatureStatus, FeatureStatus, Polarity, StatusKind, StatusSet, StatusSetBuilder,
};
pub use switch::{FeatureSwitch, SwitchTable};
