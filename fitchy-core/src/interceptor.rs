//! Interceptor strategies
//!
//! A target registered for interception describes its switched operations
//! through [`Observable`]: switches declared at the capability level (the
//! traits it implements) and switches placed on the concrete type. An
//! [`Interceptor`] merges the two into the lookup table the invoker uses.
//!
//! | Strategy | id | Capability required | Priority |
//! |---|---|---|---|
//! | [`ProxyInterceptor`] | `proxy` | yes | declared, then implementation |
//! | [`SubclassInterceptor`] | `subclass` | no | implementation, then declared |

use crate::error::{FitchyError, Result};
use crate::switch::SwitchTable;
use tracing::debug;

/// Identifier of [`ProxyInterceptor`].
pub const PROXY_INTERCEPTOR_ID: &str = "proxy";
/// Identifier of [`SubclassInterceptor`].
pub const SUBCLASS_INTERCEPTOR_ID: &str = "subclass";

/// A type whose operations may be switched by features.
///
/// ```
/// use fitchy_core::{FeatureSwitch, Observable, SwitchTable};
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter;
///
/// impl Observable for EnglishGreeter {
///     fn capability_operations(&self) -> &'static [&'static str] {
///         &["greet"]
///     }
///
///     fn declared_switches(&self) -> SwitchTable {
///         SwitchTable::new().switch("greet", "greeting")
///     }
///
///     fn implemented_switches(&self) -> SwitchTable {
///         SwitchTable::new()
///     }
/// }
/// ```
pub trait Observable: Send + Sync {
    /// Operations exposed through capability traits.
    fn capability_operations(&self) -> &'static [&'static str] {
        &[]
    }

    /// Switches declared on the capability traits.
    fn declared_switches(&self) -> SwitchTable {
        SwitchTable::new()
    }

    /// Switches placed on the concrete type.
    fn implemented_switches(&self) -> SwitchTable;
}

/// Lookup table built for one registered target
#[derive(Debug, Clone)]
pub struct SwitchLookup {
    interceptor: String,
    switches: SwitchTable,
}

impl SwitchLookup {
    pub fn new(interceptor: impl Into<String>, switches: SwitchTable) -> Self {
        Self {
            interceptor: interceptor.into(),
            switches,
        }
    }

    /// Id of the interceptor that built the table
    pub fn interceptor(&self) -> &str {
        &self.interceptor
    }

    pub fn switches(&self) -> &SwitchTable {
        &self.switches
    }

    pub fn into_switches(self) -> SwitchTable {
        self.switches
    }
}

/// Strategy that builds a target's lookup table at registration
pub trait Interceptor: Send + Sync {
    /// Identifier used in configuration descriptors
    fn id(&self) -> &str;

    fn lookup(&self, target: &dyn Observable) -> Result<SwitchLookup>;
}

/// Capability-based interception; declared switches take priority
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyInterceptor;

impl Interceptor for ProxyInterceptor {
    fn id(&self) -> &str {
        PROXY_INTERCEPTOR_ID
    }

    fn lookup(&self, target: &dyn Observable) -> Result<SwitchLookup> {
        let declared = target.declared_switches();
        if target.capability_operations().is_empty() && declared.is_empty() {
            return Err(FitchyError::InvalidArgument(
                "observable object must expose at least one capability operation".to_string(),
            ));
        }

        let switches = merge(declared, target.implemented_switches())?;
        debug!(
            interceptor = PROXY_INTERCEPTOR_ID,
            switches = switches.len(),
            "Built switch lookup"
        );
        Ok(SwitchLookup::new(PROXY_INTERCEPTOR_ID, switches))
    }
}

/// Type-based interception; implementation switches take priority
#[derive(Debug, Clone, Copy, Default)]
pub struct SubclassInterceptor;

impl Interceptor for SubclassInterceptor {
    fn id(&self) -> &str {
        SUBCLASS_INTERCEPTOR_ID
    }

    fn lookup(&self, target: &dyn Observable) -> Result<SwitchLookup> {
        let switches = merge(target.implemented_switches(), target.declared_switches())?;
        debug!(
            interceptor = SUBCLASS_INTERCEPTOR_ID,
            switches = switches.len(),
            "Built switch lookup"
        );
        Ok(SwitchLookup::new(SUBCLASS_INTERCEPTOR_ID, switches))
    }
}

/// Entries of `primary` win; `secondary` fills the remaining operations.
fn merge(primary: SwitchTable, secondary: SwitchTable) -> Result<SwitchTable> {
    let mut merged = primary;
    for (operation, switch) in secondary.iter() {
        if !merged.contains(operation) {
            merged.insert(operation, switch.clone());
        }
    }

    for (operation, switch) in merged.iter() {
        if switch.value().trim().is_empty() {
            return Err(FitchyError::InvalidArgument(format!(
                "switch on '{}' does not name a feature",
                operation
            )));
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switch::FeatureSwitch;

    struct Both;

    impl Observable for Both {
        fn capability_operations(&self) -> &'static [&'static str] {
            &["shared", "declared_only"]
        }

        fn declared_switches(&self) -> SwitchTable {
            SwitchTable::new()
                .switch("shared", "declared.feature")
                .switch("declared_only", "declared.feature")
        }

        fn implemented_switches(&self) -> SwitchTable {
            SwitchTable::new()
                .switch("shared", "impl.feature")
                .switch("impl_only", "impl.feature")
        }
    }

    struct Bare;

    impl Observable for Bare {
        fn implemented_switches(&self) -> SwitchTable {
            SwitchTable::new().switch("run", "bare.feature")
        }
    }

    struct Unnamed;

    impl Observable for Unnamed {
        fn implemented_switches(&self) -> SwitchTable {
            SwitchTable::new().switch("run", FeatureSwitch::new(""))
        }
    }

    #[test]
    fn test_proxy_prefers_declared() {
        let lookup = ProxyInterceptor.lookup(&Both).unwrap();
        let switches = lookup.switches();

        assert_eq!(lookup.interceptor(), "proxy");
        assert_eq!(switches.get("shared").unwrap().value(), "declared.feature");
        assert_eq!(switches.get("impl_only").unwrap().value(), "impl.feature");
        assert_eq!(switches.len(), 3);
    }

    #[test]
    fn test_subclass_prefers_implementation() {
        let lookup = SubclassInterceptor.lookup(&Both).unwrap();
        let switches = lookup.switches();

        assert_eq!(lookup.interceptor(), "subclass");
        assert_eq!(switches.get("shared").unwrap().value(), "impl.feature");
        assert_eq!(switches.get("declared_only").unwrap().value(), "declared.feature");
    }

    #[test]
    fn test_proxy_requires_capability() {
        assert!(matches!(
            ProxyInterceptor.lookup(&Bare),
            Err(FitchyError::InvalidArgument(_))
        ));
        assert!(SubclassInterceptor.lookup(&Bare).is_ok());
    }

    #[test]
    fn test_switch_without_feature_rejected() {
        assert!(matches!(
            SubclassInterceptor.lookup(&Unnamed),
            Err(FitchyError::InvalidArgument(msg)) if msg.contains("run")
        ));
    }
}
