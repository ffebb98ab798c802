// sentinel-core/src/detectors/semantic.rs
//! Embedding-similarity detection of forbidden intents, plus a deterministic
//! keyword blacklist.
//!
//! Each forbidden-intent phrase from the profile is embedded once when the
//! detector is built; per scan only the input text is embedded and compared
//! against the cached vectors. Every intent at or above the threshold yields
//! its own BLOCK finding carrying that similarity as its score; the
//! orchestrator's reason picks the highest. Blacklist keywords are matched
//! case-insensitively before any embedding work and block at score 1.0, so
//! they keep working when no provider is configured.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use sentinel_embed::cosine_similarity;

use crate::backends::EmbeddingProvider;
use crate::detector::{Detector, DetectorKind};
use crate::errors::SentinelError;
use crate::verdict::Finding;

struct IntentEmbedding {
    phrase: String,
    vector: Vec<f32>,
}

pub struct SemanticDetector {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    threshold: f64,
    intents: Vec<IntentEmbedding>,
    /// Lowercased forbidden keywords, matched as substrings.
    blacklist: Vec<String>,
}

impl SemanticDetector {
    /// Build the detector, embedding every forbidden-intent phrase up front.
    ///
    /// A missing provider is accepted here; the orchestrator rejects the
    /// combination of `required: true` and no provider before construction.
    pub fn new(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        threshold: f64,
        forbidden_intents: &[String],
        blacklist: &[String],
    ) -> Result<Self, SentinelError> {
        let mut intents = Vec::with_capacity(forbidden_intents.len());
        if let Some(provider) = &provider {
            for phrase in forbidden_intents {
                let vector = provider
                    .embed(phrase)
                    .with_context(|| format!("failed to embed intent phrase '{phrase}'"))?;
                intents.push(IntentEmbedding { phrase: phrase.clone(), vector });
            }
            debug!("Cached {} forbidden-intent embeddings.", intents.len());
        }
        let blacklist = blacklist.iter().map(|k| k.to_lowercase()).collect();
        Ok(Self { provider, threshold, intents, blacklist })
    }

    pub fn is_degraded(&self) -> bool {
        self.provider.is_none()
    }

    fn scan_blacklist(&self, text: &str) -> Vec<Finding> {
        let lowered = text.to_lowercase();
        self.blacklist
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .map(|keyword| {
                Finding::block(
                    DetectorKind::Semantic,
                    "Semantic:Blacklist",
                    1.0,
                    format!("input contains blacklisted keyword '{keyword}'"),
                )
            })
            .collect()
    }
}

impl Detector for SemanticDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Semantic
    }

    fn scan(&self, text: &str) -> Result<Vec<Finding>> {
        let mut findings = self.scan_blacklist(text);
        if !findings.is_empty() {
            return Ok(findings);
        }

        let Some(provider) = &self.provider else {
            warn!("Semantic detector enabled without an embedding provider; skipping.");
            findings.push(Finding::info(
                DetectorKind::Semantic,
                "Semantic:Unavailable",
                "no embedding provider configured; semantic check skipped",
            ));
            return Ok(findings);
        };
        if self.intents.is_empty() {
            return Ok(findings);
        }

        let vector = provider.embed(text).context("failed to embed input text")?;

        // Every intent at or above the threshold is reported; the verdict's
        // reason keys off the highest score.
        for intent in &self.intents {
            let sim = f64::from(cosine_similarity(&vector, &intent.vector));
            if sim >= self.threshold {
                findings.push(Finding::block(
                    DetectorKind::Semantic,
                    "Semantic:Intent",
                    sim,
                    format!("input matches forbidden intent '{}'", intent.phrase),
                ));
            }
        }
        Ok(findings)
    }
}
