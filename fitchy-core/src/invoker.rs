//! Switched invocation
//!
//! An [`AnnotatedMethodInvoker`] pairs a resolver with the switch table of
//! one target. Operations without a switch always run; switched operations
//! run only while their feature is available. A suppressed call is reported
//! as `Ok(None)` and the closure is never executed.
//!
//! ```
//! use std::sync::Arc;
//! use fitchy_core::{AnnotatedMethodInvoker, Configuration, FeatureContext, FeatureResolver, SwitchTable};
//!
//! let context = Arc::new(FeatureContext::new(Arc::new(Configuration::default_config().unwrap())));
//! let invoker = AnnotatedMethodInvoker::new(
//!     FeatureResolver::new(context.clone()),
//!     SwitchTable::new().switch("greet", "greeting"),
//! );
//!
//! assert_eq!(invoker.invoke("greet", || "hello").unwrap(), None);
//! assert_eq!(invoker.invoke("wave", || "o/").unwrap(), Some("o/"));
//!
//! context.add_feature("greeting").unwrap();
//! assert_eq!(invoker.invoke("greet", || "hello").unwrap(), Some("hello"));
//! ```

use crate::error::{FitchyError, Result};
use crate::resolver::FeatureResolver;
use crate::switch::{FeatureSwitch, SwitchTable};
use tracing::debug;

/// Outcome of the switch check for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The operation has no switch
    Unswitched,
    /// The switch's feature is available
    Available,
    /// The switch's feature is unavailable; the call is skipped
    Suppressed,
}

impl Dispatch {
    pub fn should_invoke(&self) -> bool {
        !matches!(self, Dispatch::Suppressed)
    }
}

/// Decides and performs switched calls for one target
#[derive(Debug, Clone)]
pub struct AnnotatedMethodInvoker {
    resolver: FeatureResolver,
    switches: SwitchTable,
}

impl AnnotatedMethodInvoker {
    pub fn new(resolver: FeatureResolver, switches: SwitchTable) -> Self {
        Self { resolver, switches }
    }

    pub fn resolver(&self) -> &FeatureResolver {
        &self.resolver
    }

    pub fn switches(&self) -> &SwitchTable {
        &self.switches
    }

    pub fn switch_for(&self, operation: &str) -> Option<&FeatureSwitch> {
        self.switches.get(operation)
    }

    /// Check `operation` against its switch without calling anything
    pub fn dispatch(&self, operation: &str) -> Result<Dispatch> {
        let Some(switch) = self.switches.get(operation) else {
            return Ok(Dispatch::Unswitched);
        };

        if self.resolver.is_feature_available(Some(switch))? {
            Ok(Dispatch::Available)
        } else {
            debug!(
                operation = operation,
                feature = switch.value(),
                "Suppressed switched call"
            );
            Ok(Dispatch::Suppressed)
        }
    }

    /// Run `call` unless the operation is switched off.
    ///
    /// The return value of `call` is passed through unchanged inside `Some`.
    pub fn invoke<R>(&self, operation: &str, call: impl FnOnce() -> R) -> Result<Option<R>> {
        if self.dispatch(operation)?.should_invoke() {
            Ok(Some(call()))
        } else {
            Ok(None)
        }
    }

    /// Like [`invoke`](Self::invoke) for fallible operations; the operation's
    /// own error is returned as is.
    pub fn try_invoke<R, E>(
        &self,
        operation: &str,
        call: impl FnOnce() -> std::result::Result<R, E>,
    ) -> std::result::Result<Option<R>, E>
    where
        E: From<FitchyError>,
    {
        if self.dispatch(operation)?.should_invoke() {
            call().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Like [`invoke`](Self::invoke), yielding `R::default()` for a
    /// suppressed call.
    pub fn invoke_or_default<R: Default>(&self, operation: &str, call: impl FnOnce() -> R) -> Result<R> {
        Ok(self.invoke(operation, call)?.unwrap_or_default())
    }
}
