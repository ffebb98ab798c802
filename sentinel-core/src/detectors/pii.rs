// sentinel-core/src/detectors/pii.rs
//! PII span detection.
//!
//! Prefers an `EntityRecognizer` backend when one is configured and healthy;
//! otherwise falls back to the built-in PII pattern group. The fallback is a
//! complete substitution, never a merge, so one input is only ever scanned
//! by one source of spans. A profile can mark the detector `required`, in
//! which case losing the backend mid-flight blocks the input instead of
//! degrading.

use anyhow::Result;
use log::warn;
use std::sync::Arc;

use crate::backends::EntityRecognizer;
use crate::detector::{Detector, DetectorKind};
use crate::detectors::patterns::{self, CompiledPattern, PatternGroup};
use crate::detectors::regex::scan_compiled;
use crate::errors::SentinelError;
use crate::verdict::{Finding, Span};

pub struct PiiDetector {
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    min_confidence: f64,
    fallback: Vec<Arc<CompiledPattern>>,
    required: bool,
}

impl PiiDetector {
    pub fn new(
        profile_name: &str,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        min_confidence: f64,
        pattern_names: &[String],
        required: bool,
    ) -> Result<Self, SentinelError> {
        let fallback = if pattern_names.is_empty() {
            let defaults: Vec<String> = patterns::names_in_group(PatternGroup::Pii)
                .into_iter()
                .map(String::from)
                .collect();
            patterns::compile_named(profile_name, &defaults)?
        } else {
            patterns::compile_named(profile_name, pattern_names)?
        };
        Ok(Self {
            recognizer,
            min_confidence,
            fallback,
            required,
        })
    }

    fn scan_fallback(&self, text: &str) -> Vec<Finding> {
        scan_compiled(DetectorKind::Pii, &self.fallback, text)
    }

    fn blocked_unavailable(&self) -> Vec<Finding> {
        vec![Finding::block(
            DetectorKind::Pii,
            "Pii:Unavailable",
            1.0,
            "required entity recognizer is unavailable",
        )]
    }
}

impl Detector for PiiDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pii
    }

    fn scan(&self, text: &str) -> Result<Vec<Finding>> {
        let Some(recognizer) = &self.recognizer else {
            if self.required {
                return Ok(self.blocked_unavailable());
            }
            return Ok(self.scan_fallback(text));
        };

        match recognizer.detect_entities(text) {
            Ok(entities) => {
                let mut findings = Vec::new();
                for entity in entities {
                    if entity.confidence < self.min_confidence {
                        continue;
                    }
                    if entity.end > text.len() || entity.start >= entity.end {
                        warn!(
                            "Recognizer returned out-of-range span [{}, {}); dropped.",
                            entity.start, entity.end
                        );
                        continue;
                    }
                    findings.push(Finding::redact(
                        DetectorKind::Pii,
                        format!("PII:{}", entity.label.to_uppercase()),
                        entity.confidence,
                        Span::new(entity.start, entity.end),
                        format!("recognizer entity '{}'", entity.label),
                    ));
                }
                Ok(findings)
            }
            Err(e) => {
                if self.required {
                    warn!("Required entity recognizer failed: {e:#}");
                    return Ok(self.blocked_unavailable());
                }
                warn!("Entity recognizer failed, using pattern fallback: {e:#}");
                Ok(self.scan_fallback(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Entity;
    use crate::verdict::Severity;
    use anyhow::anyhow;

    struct StubRecognizer {
        entities: Vec<Entity>,
        fail: bool,
    }

    impl EntityRecognizer for StubRecognizer {
        fn detect_entities(&self, _text: &str) -> Result<Vec<Entity>> {
            if self.fail {
                return Err(anyhow!("model not loaded"));
            }
            Ok(self.entities.clone())
        }
    }

    #[test]
    fn test_fallback_patterns_find_email() {
        let d = PiiDetector::new("test", None, 0.5, &[], false).unwrap();
        let findings = d.scan("reach me at a@b.com please").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "PII:EMAIL");
        assert_eq!(findings[0].severity, Severity::Redact);
    }

    #[test]
    fn test_recognizer_confidence_filter() {
        let recognizer = Arc::new(StubRecognizer {
            entities: vec![
                Entity { label: "person".into(), start: 0, end: 5, confidence: 0.9 },
                Entity { label: "person".into(), start: 6, end: 11, confidence: 0.3 },
            ],
            fail: false,
        });
        let d = PiiDetector::new("test", Some(recognizer), 0.5, &[], false).unwrap();
        let findings = d.scan("Alice spoke").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "PII:PERSON");
        assert_eq!(findings[0].score, 0.9);
    }

    #[test]
    fn test_recognizer_failure_falls_back_to_patterns() {
        let recognizer = Arc::new(StubRecognizer { entities: vec![], fail: true });
        let d = PiiDetector::new("test", Some(recognizer), 0.5, &[], false).unwrap();
        let findings = d.scan("mail a@b.com").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "PII:EMAIL");
    }

    #[test]
    fn test_required_without_backend_blocks() {
        let d = PiiDetector::new("test", None, 0.5, &[], true).unwrap();
        let findings = d.scan("anything").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Block);
        assert_eq!(findings[0].category, "Pii:Unavailable");
    }

    #[test]
    fn test_out_of_range_entity_dropped() {
        let recognizer = Arc::new(StubRecognizer {
            entities: vec![Entity { label: "x".into(), start: 2, end: 99, confidence: 0.9 }],
            fail: false,
        });
        let d = PiiDetector::new("test", Some(recognizer), 0.5, &[], false).unwrap();
        assert!(d.scan("short").unwrap().is_empty());
    }
}
