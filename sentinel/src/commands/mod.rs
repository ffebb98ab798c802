// sentinel/src/commands/mod.rs
//! Command implementations for the sentinel CLI.

pub mod check;
pub mod stream;
