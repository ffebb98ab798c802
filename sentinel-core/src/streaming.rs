// sentinel-core/src/streaming.rs
//! Incremental sanitization of token streams.
//!
//! `StreamSanitizer` buffers incoming tokens until a sentence boundary, runs
//! each complete sentence through the engine and emits the sanitized form.
//! A boundary is a terminator (`.`, `!`, `?`) followed by whitespace, or a
//! newline; a bare trailing terminator stays buffered so abbreviations and
//! addresses like `a@b.com` are never split mid-token.
//!
//! Once any sentence blocks, the stream is poisoned: nothing further is
//! emitted and all suppressed text accumulates in the blocked trace for
//! audit. `flush` closes the stream; a closed sanitizer rejects further use.

use anyhow::{bail, Result};
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use crate::orchestrator::Orchestrator;

pub struct StreamSanitizer {
    engine: Arc<Orchestrator>,
    session_id: Uuid,
    buffer: String,
    /// Text suppressed after the stream blocked, kept for audit.
    trace: String,
    blocked: bool,
    closed: bool,
    max_buffer: usize,
}

/// Locate the next sentence boundary in `buf`.
///
/// Returns `(sentence_end, rest_start)` byte offsets: the sentence is
/// `buf[..sentence_end]`, the retained remainder starts at `rest_start`.
fn find_boundary(buf: &str) -> Option<(usize, usize)> {
    let mut iter = buf.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if c == '\n' {
            return Some((i, i + 1));
        }
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(j, next)) = iter.peek() {
                if next.is_whitespace() {
                    return Some((j, j));
                }
            }
        }
    }
    None
}

impl StreamSanitizer {
    pub fn new(engine: Arc<Orchestrator>) -> Self {
        let max_buffer = engine.stream_config().max_buffer;
        let session_id = Uuid::new_v4();
        debug!("Stream session {session_id} opened (max_buffer={max_buffer}).");
        Self {
            engine,
            session_id,
            buffer: String::new(),
            trace: String::new(),
            blocked: false,
            closed: false,
            max_buffer,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Suppressed text accumulated since the stream blocked.
    pub fn blocked_trace(&self) -> &str {
        &self.trace
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one token, returning the sanitized sentences it completed.
    ///
    /// Returns an empty vector while no boundary has been reached and always
    /// after the stream blocked. Fails on a closed stream.
    pub fn process(&mut self, token: &str) -> Result<Vec<String>> {
        if self.closed {
            bail!("stream session {} is closed", self.session_id);
        }

        if self.blocked {
            self.trace.push_str(token);
            return Ok(Vec::new());
        }

        self.buffer.push_str(token);
        let mut emissions = Vec::new();

        while let Some((end, rest_start)) = find_boundary(&self.buffer) {
            let sentence = self.buffer[..end].to_string();
            self.buffer.drain(..rest_start);
            self.emit_sentence(&sentence, &mut emissions);
            if self.blocked {
                // Whatever remains buffered is suppressed too.
                self.trace.push_str(&self.buffer);
                self.buffer.clear();
                return Ok(emissions);
            }
        }

        // Oversized buffer without a boundary: force a synthetic one rather
        // than grow without bound.
        if self.buffer.len() > self.max_buffer {
            debug!(
                "Stream session {}: buffer exceeded {} bytes, forcing boundary.",
                self.session_id, self.max_buffer
            );
            let sentence = std::mem::take(&mut self.buffer);
            self.emit_sentence(&sentence, &mut emissions);
        }

        Ok(emissions)
    }

    /// Validate and close the stream, returning the final sanitized fragment
    /// if one remains. Fails when already closed.
    pub fn flush(&mut self) -> Result<Option<String>> {
        if self.closed {
            bail!("stream session {} is already closed", self.session_id);
        }
        self.closed = true;

        if self.blocked {
            self.trace.push_str(&self.buffer);
            self.buffer.clear();
            return Ok(None);
        }

        let remainder = std::mem::take(&mut self.buffer);
        let mut emissions = Vec::new();
        self.emit_sentence(&remainder, &mut emissions);
        Ok(emissions.pop())
    }

    fn emit_sentence(&mut self, raw: &str, emissions: &mut Vec<String>) {
        let sentence = raw.trim();
        if sentence.is_empty() {
            return;
        }

        let verdict = self.engine.validate(sentence);
        if verdict.is_blocked() {
            info!(
                "Stream session {} blocked: {}",
                self.session_id,
                verdict.reason.as_deref().unwrap_or("unspecified")
            );
            self.blocked = true;
            self.trace.push_str(sentence);
            return;
        }
        emissions.push(verdict.sanitized_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_requires_whitespace_after_terminator() {
        assert_eq!(find_boundary("Hello. World"), Some((6, 6)));
        assert_eq!(find_boundary("a@b.com"), None);
        assert_eq!(find_boundary("Done."), None);
    }

    #[test]
    fn test_newline_is_a_boundary() {
        assert_eq!(find_boundary("line one\nline two"), Some((8, 9)));
    }

    #[test]
    fn test_question_and_exclamation_terminate() {
        assert_eq!(find_boundary("Really? Yes"), Some((7, 7)));
        assert_eq!(find_boundary("Stop! Now"), Some((5, 5)));
    }
}
