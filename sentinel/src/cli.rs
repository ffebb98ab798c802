// sentinel/src/cli.rs
//! This file defines the command-line interface (CLI) for the sentinel
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate and sanitize text bound for or coming from an LLM",
    long_about = "Sentinel is a command-line content firewall for text exchanged with language-model backends. It runs input through a profile-defined pipeline of detectors (patterns, prompt injection, PII, semantic intent) and either blocks it, redacts sensitive spans, or passes it through unchanged.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this run).
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `sentinel` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validates an input file or stdin and prints the sanitized result.
    #[command(about = "Validates an input file or stdin and prints the sanitized result.")]
    Check(CheckCommand),

    /// Sanitizes a stream line by line, emitting complete sentences as they pass.
    #[command(about = "Sanitizes a stream line by line, emitting complete sentences as they pass.")]
    Stream(StreamCommand),
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Text to validate directly; stdin or --input-file is used when absent.
    #[arg(value_name = "TEXT", help = "Text to validate; reads stdin or --input-file when omitted.")]
    pub text: Option<String>,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "text", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a custom validation profile (YAML).
    #[arg(long = "profile", short = 'p', value_name = "FILE", help = "Path to a custom validation profile (YAML).")]
    pub profile: Option<PathBuf>,

    /// Print the full verdict as JSON instead of the sanitized text.
    #[arg(long, help = "Print the full verdict (findings, hash, reason) as JSON.")]
    pub json: bool,
}

/// Arguments for the `stream` command.
#[derive(Parser, Debug)]
pub struct StreamCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom validation profile (YAML).
    #[arg(long = "profile", short = 'p', value_name = "FILE", help = "Path to a custom validation profile (YAML).")]
    pub profile: Option<PathBuf>,
}
