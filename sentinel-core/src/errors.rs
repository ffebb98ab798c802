//! errors.rs - Custom error types for the sentinel-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Note that these errors only surface at profile load / engine compile
//! time; `validate` itself never returns one (detector faults are downgraded
//! to INFO findings, adversarial input is a blocked Verdict).
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `sentinel-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SentinelError {
    #[error("Failed to compile pattern '{0}': {1}")]
    PatternCompilationError(String, regex::Error),

    #[error("Profile '{0}' references unknown built-in pattern '{1}'")]
    UnknownPattern(String, String),

    #[error("Profile '{0}' validation failed: {1}")]
    InvalidProfile(String, String),

    #[error("Profile '{0}' references unregistered plugin module '{1}'")]
    UnknownPlugin(String, String),

    #[error("Detector '{0}' is marked required but its backend is not configured")]
    RequiredBackendMissing(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
