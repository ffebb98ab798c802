// sentinel-core/src/lib.rs
//! Core guardrails engine for validating and sanitizing LLM text.
//!
//! This library compiles declarative profiles into a pipeline of detectors
//! (pattern, injection, PII, semantic-intent, plugin) and runs text through
//! them to produce a deterministic [`Verdict`]: pass, pass-with-redactions,
//! or block. It also provides incremental sanitization of token streams and
//! an atomically swappable engine handle for long-running hosts.
//!
//! Typical use:
//!
//! ```no_run
//! use sentinel_core::{Backends, Orchestrator, PluginRegistry, Profile};
//!
//! # fn main() -> anyhow::Result<()> {
//! let profile = Profile::load_default()?;
//! let engine = Orchestrator::compile(profile, &Backends::default(), &PluginRegistry::new())?;
//! let verdict = engine.validate("My email is jane@example.com.");
//! assert!(verdict.valid);
//! assert_eq!(verdict.sanitized_text, "My email is <REDACTED:EMAIL>.");
//! # Ok(())
//! # }
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod active;
pub mod backends;
pub mod detector;
pub mod detectors;
pub mod errors;
pub mod orchestrator;
pub mod profile;
pub mod streaming;
pub mod validators;
pub mod verdict;

pub use active::ActiveEngine;
pub use backends::{Backends, EmbeddingProvider, Entity, EntityRecognizer};
pub use detector::{Detector, DetectorKind};
pub use detectors::{PluginDetector, PluginRegistry};
pub use errors::SentinelError;
pub use orchestrator::Orchestrator;
pub use profile::{DetectorSpec, Profile, StreamConfig};
pub use streaming::StreamSanitizer;
pub use verdict::{input_hash, Finding, Severity, Span, Verdict};
