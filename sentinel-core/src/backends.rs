// sentinel-core/src/backends.rs
//! Collaborator contracts consumed by the core.
//!
//! The engine treats embedding computation and named-entity recognition as
//! black boxes behind these traits: a vector for a string, or a list of
//! detected entity spans. Deployments plug in real model backends; tests and
//! the CLI use the deterministic [`HashEmbedder`] from `sentinel-embed`.

use anyhow::Result;
use std::sync::Arc;

use sentinel_embed::HashEmbedder;

/// Produces a fixed-dimension vector for a text.
///
/// Must be deterministic for identical input; the dimension is fixed per
/// deployment. The orchestrator caches the embedding of each configured
/// forbidden-intent phrase at profile compile time, so `embed` is only
/// called once per phrase plus once per validated text.
pub trait EmbeddingProvider: Send + Sync {
    fn dimension(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        HashEmbedder::dimension(self)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(HashEmbedder::embed(self, text))
    }
}

/// One entity span reported by an NER backend. Offsets are half-open
/// `[start, end)` byte ranges into the scanned text.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub label: String,
    pub start: usize,
    pub end: usize,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Detects named entities in text.
pub trait EntityRecognizer: Send + Sync {
    fn detect_entities(&self, text: &str) -> Result<Vec<Entity>>;
}

/// The set of collaborator backends available to an engine instance.
///
/// Both are optional: a missing embedding provider degrades (or hard-fails,
/// if the profile marks the semantic detector required), and a missing
/// recognizer routes PII detection to the built-in regex fallback.
#[derive(Clone, Default)]
pub struct Backends {
    pub embeddings: Option<Arc<dyn EmbeddingProvider>>,
    pub ner: Option<Arc<dyn EntityRecognizer>>,
}

impl Backends {
    pub fn with_embeddings(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings = Some(provider);
        self
    }

    pub fn with_ner(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.ner = Some(recognizer);
        self
    }
}
