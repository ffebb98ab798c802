// sentinel-core/src/detector.rs
//! Defines the core `Detector` trait and the fixed detector taxonomy.
//!
//! The `Detector` trait is the pluggable seam of the engine: every built-in
//! variant and every registered plugin implements the same stateless `scan`
//! contract, which lets the orchestrator treat them interchangeably and lets
//! one validation share detector instances across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::verdict::Finding;

/// The fixed set of detector kinds a profile can enable.
///
/// Kinds are unique within a profile and evaluated in a fixed, deterministic
/// order (see [`DetectorKind::rank`]): cheap deterministic checks first,
/// CPU-bound collaborator-backed checks after, plugins last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Named pattern scan: secret shapes and known injection phrasings.
    Regex,
    /// Heuristic jailbreak checks beyond plain patterns.
    Injection,
    /// PII span detection (NER-backed with a regex fallback).
    Pii,
    /// Embedding similarity against forbidden-intent phrases.
    Semantic,
    /// Dynamically registered third-party scanners.
    Plugin,
}

impl DetectorKind {
    /// Position in the evaluation order. Injection and secret checks run
    /// first because they are cheapest and most safety-critical.
    pub fn rank(&self) -> u8 {
        match self {
            DetectorKind::Regex => 0,
            DetectorKind::Injection => 1,
            DetectorKind::Pii => 2,
            DetectorKind::Semantic => 3,
            DetectorKind::Plugin => 4,
        }
    }

    /// Whether this kind does CPU-bound collaborator work (embedding / NER
    /// inference) that must be offloaded from the caller's event loop.
    pub fn is_cpu_bound(&self) -> bool {
        matches!(self, DetectorKind::Pii | DetectorKind::Semantic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Regex => "regex",
            DetectorKind::Injection => "injection",
            DetectorKind::Pii => "pii",
            DetectorKind::Semantic => "semantic",
            DetectorKind::Plugin => "plugin",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability that scans text and returns zero or more findings.
///
/// Implementations must be stateless across calls: `scan` takes `&self` and
/// may be invoked concurrently from many validations against one instance.
/// A returned `Err` is a detector fault; the orchestrator downgrades it to
/// an INFO finding instead of aborting the validation.
pub trait Detector: Send + Sync {
    /// The kind identifier used for profile lookup and ordering.
    fn kind(&self) -> DetectorKind;

    /// Scan `text` and report findings. Offsets in returned spans index into
    /// `text` as half-open byte ranges.
    fn scan(&self, text: &str) -> Result<Vec<Finding>>;
}
