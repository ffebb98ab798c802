// sentinel/src/commands/stream.rs
//! Line-buffered stream sanitization.
//!
//! Each input line is fed through a `StreamSanitizer`; sanitized sentences
//! are printed as soon as their boundary arrives. A blocked sentence stops
//! all further output while the rest of the input is drained for the audit
//! trace.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use sentinel_core::{Orchestrator, StreamSanitizer};

/// Sanitize `reader` line by line into `writer`. Returns whether the stream
/// stayed valid to the end.
pub fn run_stream(
    engine: Arc<Orchestrator>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<bool> {
    let mut sanitizer = StreamSanitizer::new(engine);
    info!("Stream session {} started.", sanitizer.session_id());

    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).context("Failed to read input stream")?;
        if read == 0 {
            break;
        }
        for sentence in sanitizer.process(&line)? {
            writeln!(writer, "{sentence}").context("Failed to write output")?;
        }
    }

    if let Some(tail) = sanitizer.flush()? {
        writeln!(writer, "{tail}").context("Failed to write output")?;
    }
    writer.flush().context("Failed to flush output")?;

    if sanitizer.is_blocked() {
        if io::stderr().is_terminal() {
            eprintln!("{} stream blocked; remaining output suppressed", "BLOCKED:".red().bold());
        } else {
            eprintln!("BLOCKED: stream blocked; remaining output suppressed");
        }
        return Ok(false);
    }
    Ok(true)
}
