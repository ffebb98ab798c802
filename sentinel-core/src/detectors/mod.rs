// sentinel-core/src/detectors/mod.rs
//! Built-in detector implementations.
//!
//! Each submodule implements one [`crate::detector::DetectorKind`]; the
//! orchestrator constructs them from the active profile and runs them in
//! rank order.

pub mod injection;
pub mod patterns;
pub mod pii;
pub mod plugin;
pub mod regex;
pub mod semantic;

pub use injection::InjectionDetector;
pub use pii::PiiDetector;
pub use plugin::{PluginDetector, PluginRegistry};
pub use regex::RegexDetector;
pub use semantic::SemanticDetector;
