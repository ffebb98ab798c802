// sentinel/src/commands/check.rs
//! One-shot validation of a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use owo_colors::OwoColorize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use sentinel_core::Orchestrator;

pub struct CheckOptions {
    pub input: String,
    pub output: Option<PathBuf>,
    pub json: bool,
}

/// Run the input through the engine. Returns whether the input was valid.
pub fn run_check(engine: &Orchestrator, opts: CheckOptions) -> Result<bool> {
    info!("Validating {} bytes against profile '{}'.", opts.input.len(), engine.profile().name);

    let verdict = engine.validate(&opts.input);

    let rendered = if opts.json {
        let mut s =
            serde_json::to_string_pretty(&verdict).context("Failed to serialize verdict")?;
        s.push('\n');
        s
    } else {
        let mut s = verdict.sanitized_text.clone();
        if !s.is_empty() && !s.ends_with('\n') {
            s.push('\n');
        }
        s
    };

    match &opts.output {
        Some(path) => fs::write(path, rendered.as_bytes())
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => {
            io::stdout()
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    if verdict.is_blocked() {
        let reason = verdict.reason.as_deref().unwrap_or("unspecified");
        if io::stderr().is_terminal() {
            eprintln!("{} {}", "BLOCKED:".red().bold(), reason);
        } else {
            eprintln!("BLOCKED: {reason}");
        }
    } else if verdict.was_redacted() && !opts.json {
        let redacted = verdict
            .findings
            .iter()
            .filter(|f| f.severity == sentinel_core::Severity::Redact)
            .count();
        eprintln!("Redacted {redacted} span(s).");
    }

    Ok(verdict.valid)
}
