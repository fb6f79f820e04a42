// Callback-style feature checks

use crate::context::FeatureContext;

/// Runs one of two branches depending on whether a feature is registered.
///
/// ```
/// use std::sync::Arc;
/// use fitchy_core::{Configuration, FeatureChecker, FeatureContext};
///
/// struct Banner;
///
/// impl FeatureChecker for Banner {
///     type Output = &'static str;
///
///     fn on_feature_enabled(&self) -> &'static str {
///         "new banner"
///     }
///
///     fn on_feature_disabled(&self) -> &'static str {
///         "old banner"
///     }
/// }
///
/// let context = FeatureContext::new(Arc::new(Configuration::default_config().unwrap()));
/// assert_eq!(Banner.run(&context, "banner.v2"), "old banner");
///
/// context.add_feature("banner.v2").unwrap();
/// assert_eq!(Banner.run(&context, "banner.v2"), "new banner");
/// ```
pub trait FeatureChecker {
    type Output;

    fn on_feature_enabled(&self) -> Self::Output;

    fn on_feature_disabled(&self) -> Self::Output;

    /// Registration is all that counts here; the feature's status is not
    /// inspected.
    fn run(&self, context: &FeatureContext, feature: &str) -> Self::Output {
        if context.has_feature(feature) {
            self.on_feature_enabled()
        } else {
            self.on_feature_disabled()
        }
    }
}
