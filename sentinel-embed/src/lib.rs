// sentinel-embed/src/lib.rs
#![no_std]

//! Deterministic text embedding primitives for sentinel.
//!
//! This crate provides a dependency-light embedding kernel: a feature-hashing
//! embedder that maps text to a fixed-dimension, L2-normalized vector, plus
//! the cosine similarity used to compare such vectors. It exists so the core
//! engine always has a deterministic `embed(text) -> vector` capability
//! available, independent of any external model backend.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod embedder;
pub mod similarity;

pub use embedder::{HashEmbedder, DEFAULT_DIMENSION};
pub use similarity::{cosine_similarity, l2_normalize};
