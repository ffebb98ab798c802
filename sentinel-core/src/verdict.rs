// sentinel-core/src/verdict.rs
//! Core result vocabulary shared by all detectors: severities, findings and
//! the aggregate `Verdict` returned by a validation run.
//!
//! Findings are produced fresh per validation call and never persisted by
//! this crate; audit consumers read them off the returned `Verdict`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use lazy_static::lazy_static;
use log::debug;

use crate::detector::DetectorKind;

lazy_static! {
    /// A static boolean that is initialized once to determine if raw matched
    /// text is allowed in debug logs. Off by default: log lines must never
    /// leak the PII the engine exists to contain.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("SENTINEL_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// How seriously a single finding should be treated.
///
/// The ordering matters: `Block > Redact > Info`, so `max()` over a set of
/// findings yields the verdict-driving severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational only; never changes the verdict.
    Info,
    /// Mask the matched span and continue.
    Redact,
    /// Reject the whole input.
    Block,
}

/// A half-open `[start, end)` byte range into the validated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One detector's evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Which detector produced this finding.
    pub detector: DetectorKind,
    pub severity: Severity,
    /// Free-form label such as `"PII:EMAIL"` or `"Semantic:Intent"`.
    pub category: String,
    /// Detector-defined meaning in `[0, 1]`: similarity for semantic hits,
    /// confidence for NER, `1.0` for deterministic pattern hits.
    pub score: f64,
    /// Offsets into the input. Set on REDACT findings (drives the rewrite)
    /// and on pattern-match BLOCK findings; whole-text findings carry none.
    pub span: Option<Span>,
    /// Human-readable explanation.
    pub message: String,
}

impl Finding {
    pub fn info(detector: DetectorKind, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            detector,
            severity: Severity::Info,
            category: category.into(),
            score: 0.0,
            span: None,
            message: message.into(),
        }
    }

    pub fn redact(
        detector: DetectorKind,
        category: impl Into<String>,
        score: f64,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            severity: Severity::Redact,
            category: category.into(),
            score,
            span: Some(span),
            message: message.into(),
        }
    }

    pub fn block(
        detector: DetectorKind,
        category: impl Into<String>,
        score: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            severity: Severity::Block,
            category: category.into(),
            score,
            span: None,
            message: message.into(),
        }
    }

    /// A BLOCK finding that points at the offending bytes. Pattern matches
    /// use this; whole-text verdicts (semantic, heuristics) have no span.
    pub fn block_at(
        detector: DetectorKind,
        category: impl Into<String>,
        score: f64,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            span: Some(span),
            ..Self::block(detector, category, score, message)
        }
    }

    /// The placeholder written over this finding's span during redaction,
    /// e.g. category `"PII:EMAIL"` becomes `<REDACTED:EMAIL>`.
    pub fn placeholder(&self) -> String {
        let label = self
            .category
            .rsplit(':')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.category.as_str());
        format!("<REDACTED:{}>", label)
    }
}

/// The aggregate outcome of one validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// False iff any finding carries `Severity::Block`.
    pub valid: bool,
    /// Set when `valid` is false; built from the highest-scoring BLOCK
    /// finding, e.g. `"Semantic:Intent violation (0.85)"`.
    pub reason: Option<String>,
    /// The input with each surviving REDACT span replaced by a placeholder.
    /// Equal to the input when nothing was redacted; empty on a blocked
    /// verdict (callers must not forward blocked content).
    pub sanitized_text: String,
    /// Full detail for audit consumers, in detector evaluation order.
    pub findings: Vec<Finding>,
    /// SHA-256 of the original input, for audit correlation.
    pub input_hash: String,
}

impl Verdict {
    /// A passing verdict with the input untouched.
    pub fn pass(input: &str) -> Self {
        Self {
            valid: true,
            reason: None,
            sanitized_text: input.to_string(),
            findings: Vec::new(),
            input_hash: input_hash(input),
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.valid
    }

    /// True when the verdict passed but the text was rewritten.
    pub fn was_redacted(&self) -> bool {
        self.valid && self.findings.iter().any(|f| f.severity == Severity::Redact)
    }

    /// The highest severity present across all findings, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// SHA-256 hex digest of the input text.
pub fn input_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Collapse a sensitive string for safe inclusion in logs.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

/// Debug-log a matched snippet without leaking it.
pub fn log_match_debug(module_path: &str, category: &str, matched: &str) {
    debug!(
        "{} match: category='{}' text='{}'",
        module_path,
        category,
        get_loggable_content(matched)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Block > Severity::Redact);
        assert!(Severity::Redact > Severity::Info);
    }

    #[test]
    fn test_span_overlap_and_containment() {
        let a = Span::new(0, 10);
        let b = Span::new(4, 8);
        let c = Span::new(8, 12);
        assert!(a.contains(&b));
        assert!(a.overlaps(&c));
        assert!(!b.overlaps(&c));
    }

    #[test]
    fn test_placeholder_uses_last_category_segment() {
        let f = Finding::redact(DetectorKind::Pii, "PII:EMAIL", 1.0, Span::new(0, 4), "email");
        assert_eq!(f.placeholder(), "<REDACTED:EMAIL>");

        let f = Finding::redact(DetectorKind::Regex, "SECRET", 1.0, Span::new(0, 4), "secret");
        assert_eq!(f.placeholder(), "<REDACTED:SECRET>");
    }

    #[test]
    fn test_input_hash_is_stable() {
        assert_eq!(input_hash("hello"), input_hash("hello"));
        assert_ne!(input_hash("hello"), input_hash("hello!"));
    }

    #[test]
    fn test_finding_json_shape() {
        let f = Finding::redact(DetectorKind::Pii, "PII:EMAIL", 0.9, Span::new(3, 8), "email");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["severity"], "REDACT");
        assert_eq!(json["detector"], "pii");
        assert_eq!(json["span"]["start"], 3);
    }
}
