//! Process-wide configuration and context
//!
//! Both slots start empty and are filled lazily: the configuration with the
//! built-in defaults, the context with an empty context over the current
//! configuration. Replacing a slot is an atomic swap; holders of the previous
//! `Arc` keep using it.
//!
//! ```
//! use fitchy_core::global;
//!
//! let config = global::configuration();
//! assert_eq!(config.reader_id(), "properties");
//! ```

use crate::configuration::{Configuration, ConfigurationBuilder};
use crate::context::FeatureContext;
use crate::status::DefaultFeatureStatus;
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

static CONFIGURATION: Lazy<ArcSwapOption<Configuration>> = Lazy::new(ArcSwapOption::empty);
static CONTEXT: Lazy<ArcSwapOption<FeatureContext>> = Lazy::new(ArcSwapOption::empty);

/// Current process configuration
pub fn configuration() -> Arc<Configuration> {
    if let Some(config) = CONFIGURATION.load_full() {
        return config;
    }

    let fresh = Arc::new(ConfigurationBuilder::from_status::<DefaultFeatureStatus>().build());
    let previous = CONFIGURATION.rcu(|current| current.clone().or_else(|| Some(fresh.clone())));

    match previous {
        Some(existing) => existing,
        None => {
            debug!("Installed default global configuration");
            fresh
        }
    }
}

/// Replace the process configuration.
///
/// The global context is not touched; contexts keep the configuration they
/// were built with.
pub fn set_configuration(config: Arc<Configuration>) {
    debug!(
        reader = config.reader_id(),
        observer = config.observer_id(),
        "Global configuration replaced"
    );
    CONFIGURATION.store(Some(config));
}

/// Current process context
pub fn context() -> Arc<FeatureContext> {
    if let Some(context) = CONTEXT.load_full() {
        return context;
    }

    let fresh = Arc::new(FeatureContext::new(configuration()));
    let previous = CONTEXT.rcu(|current| current.clone().or_else(|| Some(fresh.clone())));

    previous.unwrap_or(fresh)
}

/// Replace the process context
pub fn set_context(context: Arc<FeatureContext>) {
    debug!(features = context.size(), "Global context replaced");
    CONTEXT.store(Some(context));
}

/// Empty both slots
pub fn reset() {
    CONFIGURATION.store(None);
    CONTEXT.store(None);
}
