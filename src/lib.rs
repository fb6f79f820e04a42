// Fitchy - feature toggles for Rust
//
// Operations are switched on and off by features registered in a feature
// context; each feature carries a status from a closed status set.

// Re-export core functionality
pub use fitchy_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use fitchy_config;
