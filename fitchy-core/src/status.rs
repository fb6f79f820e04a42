//! Feature Status Model
//!
//! A [`FeatureStatus`] is a named value with an enabled/disabled polarity.
//! Statuses are grouped into a closed [`StatusSet`], either enumerated from a
//! Rust enum implementing [`StatusKind`] or assembled with
//! [`StatusSet::builder`].
//!
//! Status values compare by identity, not by name: two statuses are equal only
//! when they were produced by the same status kind (or the same built set) at
//! the same position.
//!
//! ```
//! use fitchy_core::{DefaultFeatureStatus, StatusSet};
//!
//! let statuses = StatusSet::of::<DefaultFeatureStatus>();
//! let on = statuses.iter().next().unwrap();
//!
//! assert_eq!(on.system_name(), "on");
//! assert!(on.is_enabled());
//! assert!(on.is(DefaultFeatureStatus::On));
//! ```

use crate::error::{FitchyError, Result};
use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which of the two status predicates holds for a status.
///
/// A status can never be enabled and disabled at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// `is_enabled()` holds
    Enabled,
    /// `is_disabled()` holds
    Disabled,
    /// Neither predicate holds; only matched by explicit status comparisons
    Neutral,
}

/// A closed enumeration of statuses, typically implemented by a fieldless enum.
///
/// ```
/// use fitchy_core::{Polarity, StatusKind};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Rollout {
///     Live,
///     Hidden,
///     Dark,
/// }
///
/// impl StatusKind for Rollout {
///     const ALL: &'static [Self] = &[Rollout::Live, Rollout::Hidden, Rollout::Dark];
///
///     fn name(&self) -> &'static str {
///         match self {
///             Rollout::Live => "LIVE",
///             Rollout::Hidden => "HIDDEN",
///             Rollout::Dark => "DARK",
///         }
///     }
///
///     fn system_name(&self) -> &'static str {
///         match self {
///             Rollout::Live => "live",
///             Rollout::Hidden => "hidden",
///             Rollout::Dark => "dark",
///         }
///     }
///
///     fn polarity(&self) -> Polarity {
///         match self {
///             Rollout::Live => Polarity::Enabled,
///             Rollout::Hidden => Polarity::Neutral,
///             Rollout::Dark => Polarity::Disabled,
///         }
///     }
/// }
/// ```
pub trait StatusKind: Copy + PartialEq + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Identifier of the variant itself (e.g. `ON`).
    fn name(&self) -> &'static str;

    /// Name used in feature sources and switch descriptors (e.g. `on`).
    fn system_name(&self) -> &'static str;

    fn polarity(&self) -> Polarity;
}

/// The built-in on/off status kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultFeatureStatus {
    On,
    Off,
}

impl StatusKind for DefaultFeatureStatus {
    const ALL: &'static [Self] = &[DefaultFeatureStatus::On, DefaultFeatureStatus::Off];

    fn name(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    fn system_name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    fn polarity(&self) -> Polarity {
        match self {
            Self::On => Polarity::Enabled,
            Self::Off => Polarity::Disabled,
        }
    }
}

/// Source of a status value's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StatusOrigin {
    Kind(TypeId),
    Set(u64),
}

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct StatusEntry {
    origin: StatusOrigin,
    ordinal: usize,
    name: String,
    system_name: String,
    polarity: Polarity,
}

/// A single status value. Cloning is cheap; all clones share one entry.
#[derive(Clone)]
pub struct FeatureStatus {
    entry: Arc<StatusEntry>,
}

impl FeatureStatus {
    fn new(
        origin: StatusOrigin,
        ordinal: usize,
        name: impl Into<String>,
        system_name: impl Into<String>,
        polarity: Polarity,
    ) -> Self {
        Self {
            entry: Arc::new(StatusEntry {
                origin,
                ordinal,
                name: name.into(),
                system_name: system_name.into(),
                polarity,
            }),
        }
    }

    /// Identifier of the status itself, e.g. `ON`.
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Name used in feature sources, e.g. `on`.
    pub fn system_name(&self) -> &str {
        &self.entry.system_name
    }

    pub fn polarity(&self) -> Polarity {
        self.entry.polarity
    }

    pub fn is_enabled(&self) -> bool {
        self.entry.polarity == Polarity::Enabled
    }

    pub fn is_disabled(&self) -> bool {
        self.entry.polarity == Polarity::Disabled
    }

    /// Check whether this status is the given variant of a status kind.
    pub fn is<K: StatusKind>(&self, variant: K) -> bool {
        self.entry.origin == StatusOrigin::Kind(TypeId::of::<K>())
            && K::ALL.get(self.entry.ordinal) == Some(&variant)
    }
}

impl PartialEq for FeatureStatus {
    fn eq(&self, other: &Self) -> bool {
        self.entry.origin == other.entry.origin && self.entry.ordinal == other.entry.ordinal
    }
}

impl Eq for FeatureStatus {}

impl std::hash::Hash for FeatureStatus {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.entry.origin.hash(state);
        self.entry.ordinal.hash(state);
    }
}

impl fmt::Debug for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureStatus")
            .field("name", &self.entry.name)
            .field("system_name", &self.entry.system_name)
            .field("polarity", &self.entry.polarity)
            .finish()
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry.system_name)
    }
}

/// Ordered, closed list of statuses.
#[derive(Debug, Clone)]
pub struct StatusSet {
    statuses: Vec<FeatureStatus>,
}

impl StatusSet {
    /// Enumerate every variant of a status kind.
    ///
    /// Sets built from the same kind share status identity.
    ///
    /// A kind must give every variant a distinct system name; this is checked
    /// in debug builds.
    pub fn of<K: StatusKind>() -> Self {
        debug_assert!(
            {
                let mut seen = HashSet::new();
                K::ALL.iter().all(|variant| seen.insert(variant.system_name()))
            },
            "status kind has duplicate system names"
        );

        let origin = StatusOrigin::Kind(TypeId::of::<K>());
        let statuses = K::ALL
            .iter()
            .enumerate()
            .map(|(ordinal, variant)| {
                FeatureStatus::new(
                    origin,
                    ordinal,
                    variant.name(),
                    variant.system_name(),
                    variant.polarity(),
                )
            })
            .collect();

        Self { statuses }
    }

    /// Assemble a status set from an explicit list.
    pub fn builder() -> StatusSetBuilder {
        StatusSetBuilder::new()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureStatus> {
        self.statuses.iter()
    }

    pub fn as_slice(&self) -> &[FeatureStatus] {
        &self.statuses
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl<'a> IntoIterator for &'a StatusSet {
    type Item = &'a FeatureStatus;
    type IntoIter = std::slice::Iter<'a, FeatureStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}

/// Builder for [`StatusSet`]
///
/// ```
/// use fitchy_core::StatusSet;
///
/// let statuses = StatusSet::builder()
///     .enabled("ENABLED", "an")
///     .neutral("HIDDEN", "hidden")
///     .disabled("DISABLED", "aus")
///     .build()
///     .unwrap();
///
/// assert_eq!(statuses.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct StatusSetBuilder {
    entries: Vec<(String, String, Polarity)>,
}

impl StatusSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a status with an explicit polarity
    pub fn status(
        mut self,
        name: impl Into<String>,
        system_name: impl Into<String>,
        polarity: Polarity,
    ) -> Self {
        self.entries.push((name.into(), system_name.into(), polarity));
        self
    }

    pub fn enabled(self, name: impl Into<String>, system_name: impl Into<String>) -> Self {
        self.status(name, system_name, Polarity::Enabled)
    }

    pub fn disabled(self, name: impl Into<String>, system_name: impl Into<String>) -> Self {
        self.status(name, system_name, Polarity::Disabled)
    }

    pub fn neutral(self, name: impl Into<String>, system_name: impl Into<String>) -> Self {
        self.status(name, system_name, Polarity::Neutral)
    }

    /// Build the set. Every set built here gets its own identity.
    ///
    /// Fails when the list is empty, a name is blank or two statuses share a
    /// system name.
    pub fn build(self) -> Result<StatusSet> {
        if self.entries.is_empty() {
            return Err(FitchyError::InvalidArgument(
                "a status set requires at least one status".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for (name, system_name, _) in &self.entries {
            FitchyError::require_non_empty(name, "status name is required")?;
            FitchyError::require_non_empty(system_name, "status system name is required")?;
            if !seen.insert(system_name.as_str()) {
                return Err(FitchyError::InvalidArgument(format!(
                    "duplicate status system name '{}'",
                    system_name
                )));
            }
        }

        let origin = StatusOrigin::Set(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed));
        let statuses = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, system_name, polarity))| {
                FeatureStatus::new(origin, ordinal, name, system_name, polarity)
            })
            .collect();

        Ok(StatusSet { statuses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum OtherStatus {
        On,
    }

    impl StatusKind for OtherStatus {
        const ALL: &'static [Self] = &[OtherStatus::On];

        fn name(&self) -> &'static str {
            "ON"
        }

        fn system_name(&self) -> &'static str {
            "on"
        }

        fn polarity(&self) -> Polarity {
            Polarity::Enabled
        }
    }

    #[test]
    fn test_default_status_variants() {
        let set = StatusSet::of::<DefaultFeatureStatus>();
        let names: Vec<_> = set.iter().map(|s| s.system_name()).collect();
        assert_eq!(names, vec!["on", "off"]);

        let on = &set.as_slice()[0];
        let off = &set.as_slice()[1];
        assert!(on.is_enabled() && !on.is_disabled());
        assert!(off.is_disabled() && !off.is_enabled());
        assert_eq!(on.name(), "ON");
    }

    #[test]
    fn test_same_kind_shares_identity() {
        let first = StatusSet::of::<DefaultFeatureStatus>();
        let second = StatusSet::of::<DefaultFeatureStatus>();
        assert_eq!(first.as_slice()[0], second.as_slice()[0]);
        assert_ne!(first.as_slice()[0], second.as_slice()[1]);
    }

    #[test]
    fn test_same_system_name_different_kind_not_equal() {
        let default = StatusSet::of::<DefaultFeatureStatus>();
        let other = StatusSet::of::<OtherStatus>();
        assert_eq!(default.as_slice()[0].system_name(), other.as_slice()[0].system_name());
        assert_ne!(default.as_slice()[0], other.as_slice()[0]);
    }

    #[test]
    fn test_built_sets_have_own_identity() {
        let build = || {
            StatusSet::builder()
                .enabled("ON", "on")
                .disabled("OFF", "off")
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();
        assert_ne!(first.as_slice()[0], second.as_slice()[0]);
        assert_eq!(first.as_slice()[0], first.clone().as_slice()[0]);
    }

    #[test]
    fn test_neutral_status() {
        let set = StatusSet::builder().neutral("HIDDEN", "hidden").build().unwrap();
        let hidden = &set.as_slice()[0];
        assert!(!hidden.is_enabled());
        assert!(!hidden.is_disabled());
        assert_eq!(hidden.polarity(), Polarity::Neutral);
    }

    #[test]
    fn test_builder_rejects_empty() {
        assert!(matches!(
            StatusSet::builder().build(),
            Err(FitchyError::InvalidArgument(_))
        ));
        assert!(matches!(
            StatusSet::builder().enabled("ON", " ").build(),
            Err(FitchyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_builder_rejects_duplicate_system_name() {
        let result = StatusSet::builder()
            .enabled("ON", "on")
            .disabled("OFF", "on")
            .build();
        assert!(matches!(result, Err(FitchyError::InvalidArgument(msg)) if msg.contains("'on'")));
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum ClashingStatus {
        Live,
        Dark,
    }

    impl StatusKind for ClashingStatus {
        const ALL: &'static [Self] = &[ClashingStatus::Live, ClashingStatus::Dark];

        fn name(&self) -> &'static str {
            match self {
                Self::Live => "LIVE",
                Self::Dark => "DARK",
            }
        }

        fn system_name(&self) -> &'static str {
            "live"
        }

        fn polarity(&self) -> Polarity {
            match self {
                Self::Live => Polarity::Enabled,
                Self::Dark => Polarity::Disabled,
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate system names")]
    fn test_kind_with_duplicate_system_names_panics() {
        StatusSet::of::<ClashingStatus>();
    }

    #[test]
    fn test_is_variant() {
        let set = StatusSet::of::<DefaultFeatureStatus>();
        assert!(set.as_slice()[1].is(DefaultFeatureStatus::Off));
        assert!(!set.as_slice()[1].is(DefaultFeatureStatus::On));
        assert!(!set.as_slice()[0].is(OtherStatus::On));
    }

    #[test]
    fn test_display_uses_system_name() {
        let set = StatusSet::of::<DefaultFeatureStatus>();
        assert_eq!(set.as_slice()[0].to_string(), "on");
    }
}
