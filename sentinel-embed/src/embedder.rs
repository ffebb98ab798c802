// sentinel-embed/src/embedder.rs
//! Feature-hashing text embedder.
//!
//! Maps text into a fixed-dimension vector by hashing lowercase word tokens
//! and character trigrams into buckets (the "hashing trick"). The result is
//! L2-normalized, so dot product equals cosine similarity. The embedding is
//! fully deterministic for identical input, which the core engine relies on
//! when it caches forbidden-intent vectors at profile load.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::similarity::l2_normalize;

/// Default embedding dimension when none is configured.
pub const DEFAULT_DIMENSION: usize = 256;

/// Weight given to character trigram features relative to word features.
/// Trigrams let morphologically related tokens ("launder", "laundering")
/// share buckets without a vocabulary.
const TRIGRAM_WEIGHT: f32 = 0.5;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// A deterministic, vocabulary-free text embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    /// A zero dimension is bumped to [`DEFAULT_DIMENSION`].
    pub fn new(dimension: usize) -> Self {
        let dimension = if dimension == 0 { DEFAULT_DIMENSION } else { dimension };
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed `text` into a fixed-dimension, L2-normalized vector.
    /// Empty or non-alphanumeric input yields the zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];

        for token in tokens(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            v[bucket] += 1.0;

            let chars: Vec<char> = token.chars().collect();
            if chars.len() >= 3 {
                for window in chars.windows(3) {
                    let mut gram = String::new();
                    gram.extend(window.iter());
                    let bucket = (fnv1a(gram.as_bytes()) % self.dimension as u64) as usize;
                    v[bucket] += TRIGRAM_WEIGHT;
                }
            }
        }

        l2_normalize(&mut v);
        v
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[inline]
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn embedding_is_deterministic() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed("insider trading tips"), e.embed("insider trading tips"));
    }

    #[test]
    fn embedding_has_fixed_dimension() {
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed("hello").len(), 64);
        assert_eq!(e.embed("a much longer piece of text with many words").len(), 64);
    }

    #[test]
    fn identical_text_similarity_is_one() {
        let e = HashEmbedder::default();
        let a = e.embed("how do I launder money");
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-5, "got {}", sim);
    }

    #[test]
    fn case_and_punctuation_are_normalized() {
        let e = HashEmbedder::default();
        assert_eq!(e.embed("Insider Trading!"), e.embed("insider trading"));
    }

    #[test]
    fn related_tokens_share_trigram_features() {
        let e = HashEmbedder::default();
        let a = e.embed("laundering");
        let b = e.embed("launder");
        assert!(cosine_similarity(&a, &b) > 0.3);
    }

    #[test]
    fn unrelated_text_scores_low() {
        let e = HashEmbedder::default();
        let a = e.embed("insider trading strategies");
        let b = e.embed("weather forecast for tomorrow");
        assert!(cosine_similarity(&a, &b) < 0.3);
    }

    #[test]
    fn empty_input_is_zero_vector() {
        let e = HashEmbedder::default();
        let v = e.embed("   ...   ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn zero_dimension_falls_back_to_default() {
        assert_eq!(HashEmbedder::new(0).dimension(), DEFAULT_DIMENSION);
    }
}
