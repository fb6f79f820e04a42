//! Registering targets for interception
//!
//! [`ProxyBuilder`] asks the configured [`Interceptor`] for a target's switch
//! lookup and wraps the target in an [`Observed`] handle. Decorator types
//! hold the handle and route each capability call through it.
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::{ContextBuilder, Observable, Observed, ProxyBuilder, Result, SwitchTable};
//!
//! trait Greeter {
//!     fn greet(&self) -> Option<String>;
//! }
//!
//! struct English;
//!
//! impl Observable for English {
//!     fn capability_operations(&self) -> &'static [&'static str] {
//!         &["greet"]
//!     }
//!
//!     fn declared_switches(&self) -> SwitchTable {
//!         SwitchTable::new().switch("greet", "greeting")
//!     }
//!
//!     fn implemented_switches(&self) -> SwitchTable {
//!         SwitchTable::new()
//!     }
//! }
//!
//! struct SwitchedGreeter(Observed<English>);
//!
//! impl Greeter for SwitchedGreeter {
//!     fn greet(&self) -> Option<String> {
//!         self.0.invoke("greet", |_| "hello".to_string()).ok().flatten()
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let context = Arc::new(ContextBuilder::from_stream(std::io::Cursor::new("greeting=on")).build()?);
//! let greeter = SwitchedGreeter(ProxyBuilder::from_context(context).build(English)?);
//!
//! assert_eq!(greeter.greet().as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

use crate::context::FeatureContext;
use crate::error::{FitchyError, Result};
use crate::interceptor::{Interceptor, Observable};
use crate::invoker::AnnotatedMethodInvoker;
use crate::resolver::FeatureResolver;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Registers targets against a context
#[derive(Clone)]
pub struct ProxyBuilder {
    context: Arc<FeatureContext>,
    interceptor: Arc<dyn Interceptor>,
}

impl ProxyBuilder {
    /// Builder using the interceptor named by the context's configuration
    pub fn from_context(context: Arc<FeatureContext>) -> Self {
        let interceptor = context.config().interceptor().clone();
        Self {
            context,
            interceptor,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = interceptor;
        self
    }

    pub fn build<T: Observable>(&self, target: T) -> Result<Observed<T>> {
        self.build_shared(Arc::new(target))
    }

    /// Register a target that is already shared
    pub fn build_shared<T: Observable>(&self, target: Arc<T>) -> Result<Observed<T>> {
        let lookup = self.interceptor.lookup(target.as_ref())?;
        debug!(
            target = std::any::type_name::<T>(),
            interceptor = lookup.interceptor(),
            switches = lookup.switches().len(),
            "Registered target for interception"
        );

        let invoker = AnnotatedMethodInvoker::new(
            FeatureResolver::new(self.context.clone()),
            lookup.into_switches(),
        );
        Ok(Observed { target, invoker })
    }
}

impl fmt::Debug for ProxyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyBuilder")
            .field("interceptor", &self.interceptor.id())
            .finish()
    }
}

/// Register `target` with the context's configured interceptor
pub fn observe<T: Observable>(target: T, context: Arc<FeatureContext>) -> Result<Observed<T>> {
    ProxyBuilder::from_context(context).build(target)
}

/// A target registered for interception
pub struct Observed<T> {
    target: Arc<T>,
    invoker: AnnotatedMethodInvoker,
}

impl<T> Observed<T> {
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn shared_target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn invoker(&self) -> &AnnotatedMethodInvoker {
        &self.invoker
    }

    /// Whether `operation` has a switch
    pub fn is_switched(&self, operation: &str) -> bool {
        self.invoker.switch_for(operation).is_some()
    }

    pub fn invoke<R>(&self, operation: &str, call: impl FnOnce(&T) -> R) -> Result<Option<R>> {
        self.invoker.invoke(operation, || call(&self.target))
    }

    pub fn try_invoke<R, E>(
        &self,
        operation: &str,
        call: impl FnOnce(&T) -> std::result::Result<R, E>,
    ) -> std::result::Result<Option<R>, E>
    where
        E: From<FitchyError>,
    {
        self.invoker.try_invoke(operation, || call(&self.target))
    }

    pub fn invoke_or_default<R: Default>(&self, operation: &str, call: impl FnOnce(&T) -> R) -> Result<R> {
        self.invoker.invoke_or_default(operation, || call(&self.target))
    }
}

impl<T> Clone for Observed<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            invoker: self.invoker.clone(),
        }
    }
}

impl<T> fmt::Debug for Observed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("target", &std::any::type_name::<T>())
            .field("switches", self.invoker.switches())
            .finish()
    }
}
