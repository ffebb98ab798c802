// sentinel-core/src/orchestrator.rs
//! The validation orchestrator: compiles a profile into a detector pipeline
//! and aggregates findings into a deterministic `Verdict`.
//!
//! Evaluation order is fixed by detector rank. A BLOCK finding short-circuits
//! every later detector; a detector fault is downgraded to an INFO finding so
//! one broken scanner never takes the pipeline down. Redaction spans are
//! applied first-start-wins, with overlapping later spans merged into the
//! covered range.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

use crate::backends::Backends;
use crate::detector::{Detector, DetectorKind};
use crate::detectors::{
    InjectionDetector, PiiDetector, PluginRegistry, RegexDetector, SemanticDetector,
};
use crate::errors::SentinelError;
use crate::profile::{DetectorSpec, Profile, StreamConfig};
use crate::verdict::{input_hash, Finding, Severity, Verdict};

pub struct Orchestrator {
    profile: Profile,
    /// Sorted by rank; plugins keep their profile list order.
    detectors: Vec<Arc<dyn Detector>>,
}

// Manual impl: detector trait objects are not Debug.
impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("profile", &self.profile.name)
            .field("detectors", &self.detector_kinds())
            .finish()
    }
}

impl Orchestrator {
    /// Compile `profile` into a ready-to-run pipeline.
    ///
    /// Fails when the profile is structurally invalid, references unknown
    /// patterns or plugin modules, or marks the semantic detector required
    /// without an embedding provider in `backends`.
    pub fn compile(
        profile: Profile,
        backends: &Backends,
        registry: &PluginRegistry,
    ) -> Result<Self, SentinelError> {
        profile.validate()?;

        let mut detectors: Vec<Arc<dyn Detector>> = Vec::new();
        for spec in &profile.detectors {
            if !spec.enabled() {
                debug!("Detector '{}' disabled by profile '{}'.", spec.kind(), profile.name);
                continue;
            }
            match spec {
                DetectorSpec::Regex { patterns, .. } => {
                    detectors.push(Arc::new(RegexDetector::new(&profile.name, patterns)?));
                }
                DetectorSpec::Injection { .. } => {
                    detectors.push(Arc::new(InjectionDetector::new(&profile.name)?));
                }
                DetectorSpec::Pii { min_confidence, patterns, required, .. } => {
                    detectors.push(Arc::new(PiiDetector::new(
                        &profile.name,
                        backends.ner.clone(),
                        *min_confidence,
                        patterns,
                        *required,
                    )?));
                }
                DetectorSpec::Semantic { threshold, forbidden_intents, blacklist, required, .. } => {
                    if *required && backends.embeddings.is_none() {
                        return Err(SentinelError::RequiredBackendMissing(
                            DetectorKind::Semantic.as_str().to_string(),
                        ));
                    }
                    detectors.push(Arc::new(SemanticDetector::new(
                        backends.embeddings.clone(),
                        *threshold,
                        forbidden_intents,
                        blacklist,
                    )?));
                }
                DetectorSpec::Plugin { modules, .. } => {
                    for plugin in registry.resolve(&profile.name, modules)? {
                        detectors.push(Arc::new(plugin));
                    }
                }
            }
        }

        // Stable sort: plugins stay in profile list order.
        detectors.sort_by_key(|d| d.kind().rank());
        debug!(
            "Compiled profile '{}' with {} detector(s).",
            profile.name,
            detectors.len()
        );
        Ok(Self { profile, detectors })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn stream_config(&self) -> &StreamConfig {
        &self.profile.stream
    }

    /// Enabled detector kinds in evaluation order.
    pub fn detector_kinds(&self) -> Vec<DetectorKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    /// Run the full pipeline over `input` and aggregate a verdict.
    pub fn validate(&self, input: &str) -> Verdict {
        let mut findings = Vec::new();
        let mut blocked = false;

        for detector in &self.detectors {
            if blocked {
                break;
            }
            absorb(&mut findings, &mut blocked, detector.kind(), detector.scan(input));
        }

        self.finalize(input, findings)
    }

    /// Async counterpart of [`validate`](Self::validate).
    ///
    /// Cheap deterministic detectors run inline; CPU-bound detectors are
    /// offloaded via `spawn_blocking` and run concurrently with each other.
    /// Results are absorbed in rank order. Once a BLOCK is observed no later
    /// tier is scheduled, but in-flight scans of the same tier finish; their
    /// BLOCK findings are merged into the verdict and everything else is
    /// dropped.
    pub async fn validate_async(self: &Arc<Self>, input: &str) -> Verdict {
        let mut findings = Vec::new();
        let mut blocked = false;

        for detector in self
            .detectors
            .iter()
            .filter(|d| !d.kind().is_cpu_bound() && d.kind() != DetectorKind::Plugin)
        {
            if blocked {
                break;
            }
            absorb(&mut findings, &mut blocked, detector.kind(), detector.scan(input));
        }

        if !blocked {
            let mut handles = Vec::new();
            for detector in self.detectors.iter().filter(|d| d.kind().is_cpu_bound()) {
                let detector = Arc::clone(detector);
                let text = input.to_string();
                handles.push((
                    detector.kind(),
                    tokio::task::spawn_blocking(move || detector.scan(&text)),
                ));
            }
            for (kind, handle) in handles {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(anyhow::anyhow!("detector task failed to complete: {e}")),
                };
                if blocked {
                    // The tier already ran; keep concurrent BLOCKs, drop the rest.
                    if let Ok(batch) = result {
                        findings.extend(batch.into_iter().filter(|f| f.severity == Severity::Block));
                    }
                    continue;
                }
                absorb(&mut findings, &mut blocked, kind, result);
            }
        }

        if !blocked {
            for detector in self.detectors.iter().filter(|d| d.kind() == DetectorKind::Plugin) {
                if blocked {
                    break;
                }
                absorb(&mut findings, &mut blocked, detector.kind(), detector.scan(input));
            }
        }

        self.finalize(input, findings)
    }

    fn finalize(&self, input: &str, findings: Vec<Finding>) -> Verdict {
        let hash = input_hash(input);

        // Highest-scoring BLOCK drives the reason; ties keep the earlier
        // finding, so evaluation order decides.
        let reason = findings
            .iter()
            .filter(|f| f.severity == Severity::Block)
            .fold(None::<&Finding>, |best, f| match best {
                Some(b) if b.score >= f.score => Some(b),
                _ => Some(f),
            })
            .map(|f| format!("{} violation ({:.2})", f.category, f.score));

        if let Some(reason) = reason {
            debug!("Input {} blocked: {}", &hash[..8.min(hash.len())], reason);
            return Verdict {
                valid: false,
                reason: Some(reason),
                sanitized_text: String::new(),
                findings,
                input_hash: hash,
            };
        }

        let sanitized_text = apply_redactions(input, &findings);
        Verdict {
            valid: true,
            reason: None,
            sanitized_text,
            findings,
            input_hash: hash,
        }
    }
}

fn absorb(
    findings: &mut Vec<Finding>,
    blocked: &mut bool,
    kind: DetectorKind,
    result: Result<Vec<Finding>>,
) {
    match result {
        Ok(batch) => {
            if batch.iter().any(|f| f.severity == Severity::Block) {
                *blocked = true;
            }
            findings.extend(batch);
        }
        Err(e) => {
            warn!("Detector '{kind}' failed, downgrading to INFO: {e:#}");
            findings.push(Finding::info(
                kind,
                "Detector:Fault",
                format!("{kind} detector failed: {e:#}"),
            ));
        }
    }
}

/// Rewrite `input`, replacing each surviving REDACT span with its
/// placeholder. Spans are taken in start order; a span overlapping an
/// already-accepted one gets no placeholder of its own, but still extends
/// the covered range so none of its bytes leak through.
fn apply_redactions(input: &str, findings: &[Finding]) -> String {
    let mut spans: Vec<_> = findings
        .iter()
        .filter(|f| f.severity == Severity::Redact)
        .filter_map(|f| f.span.map(|s| (s, f.placeholder())))
        .filter(|(s, _)| {
            !s.is_empty()
                && s.end <= input.len()
                && input.is_char_boundary(s.start)
                && input.is_char_boundary(s.end)
        })
        .collect();

    if spans.is_empty() {
        return input.to_string();
    }
    spans.sort_by_key(|(s, _)| (s.start, s.end));

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    for (span, placeholder) in spans {
        if span.start < cursor {
            debug!("Merging overlapping redaction span [{}, {}).", span.start, span.end);
            if span.end > cursor {
                cursor = span.end;
            }
            continue;
        }
        out.push_str(&input[cursor..span.start]);
        out.push_str(&placeholder);
        cursor = span.end;
    }
    out.push_str(&input[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Span;

    fn redact_finding(start: usize, end: usize, category: &str) -> Finding {
        Finding::redact(DetectorKind::Regex, category, 1.0, Span::new(start, end), "m")
    }

    #[test]
    fn test_apply_redactions_single_span() {
        let input = "mail a@b.com now";
        let findings = vec![redact_finding(5, 12, "PII:EMAIL")];
        assert_eq!(apply_redactions(input, &findings), "mail <REDACTED:EMAIL> now");
    }

    #[test]
    fn test_apply_redactions_merges_overlap() {
        let input = "0123456789";
        let findings = vec![
            redact_finding(1, 5, "PII:A"),
            redact_finding(3, 8, "PII:B"),
        ];
        assert_eq!(apply_redactions(input, &findings), "0<REDACTED:A>89");
    }

    #[test]
    fn test_apply_redactions_first_start_wins_on_tie() {
        let input = "0123456789";
        let findings = vec![
            redact_finding(2, 4, "PII:FIRST"),
            redact_finding(2, 6, "PII:SECOND"),
        ];
        // The shorter span keeps the placeholder; the loser still covers 4..6.
        assert_eq!(apply_redactions(input, &findings), "01<REDACTED:FIRST>6789");
    }

    #[test]
    fn test_apply_redactions_overlap_never_leaks_tail() {
        let input = "0123456789";
        let findings = vec![
            redact_finding(1, 5, "PII:A"),
            redact_finding(3, 8, "PII:B"),
        ];
        // Bytes 5..8 belong only to the merged span; they must not surface.
        let out = apply_redactions(input, &findings);
        assert_eq!(out, "0<REDACTED:A>89");
        assert!(!out.contains('5') && !out.contains('7'));
    }

    #[test]
    fn test_apply_redactions_out_of_range_span_ignored() {
        let input = "short";
        let findings = vec![redact_finding(2, 99, "PII:X")];
        assert_eq!(apply_redactions(input, &findings), "short");
    }
}
