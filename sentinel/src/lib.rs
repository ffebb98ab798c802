// sentinel/src/lib.rs
//! # Sentinel CLI
//!
//! Command-line front end for the Sentinel guardrails engine: one-shot
//! validation of files or stdin, and line-buffered sanitization of streams.

pub mod cli;
pub mod commands;
pub mod logger;
