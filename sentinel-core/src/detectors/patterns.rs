// sentinel-core/src/detectors/patterns.rs
//! The built-in named pattern set and its compile-once cache.
//!
//! Patterns are grouped into PII shapes (redacted), secret shapes (redacted)
//! and known injection phrasings (blocked). Profiles reference patterns by
//! name; compilation happens once per process through a global, thread-safe
//! cache so repeated profile loads never recompile.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::SentinelError;
use crate::verdict::Severity;

/// Maximum allowed length for a pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Which functional group a built-in pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternGroup {
    Pii,
    Secret,
    Injection,
}

/// Post-match programmatic validation to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    None,
    Ssn,
    CreditCard,
}

/// One entry in the built-in pattern table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPattern {
    /// Unique identifier used by profiles (e.g. `"email"`).
    pub name: &'static str,
    /// Finding category (e.g. `"PII:EMAIL"`).
    pub category: &'static str,
    pub group: PatternGroup,
    pub severity: Severity,
    pub pattern: &'static str,
    pub validation: Validation,
}

/// A built-in pattern with its compiled regex, ready for scanning.
#[derive(Debug)]
pub struct CompiledPattern {
    pub spec: BuiltinPattern,
    pub regex: Regex,
}

/// The full built-in table. Order within a group is scan order.
pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    // --- PII ---
    BuiltinPattern {
        name: "email",
        category: "PII:EMAIL",
        group: PatternGroup::Pii,
        severity: Severity::Redact,
        pattern: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "phone",
        category: "PII:PHONE",
        group: PatternGroup::Pii,
        severity: Severity::Redact,
        pattern: r"\b\d{3}[-.]\d{3}[-.]\d{4}\b",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "us_ssn",
        category: "PII:SSN",
        group: PatternGroup::Pii,
        severity: Severity::Redact,
        pattern: r"\b\d{3}-\d{2}-\d{4}\b",
        validation: Validation::Ssn,
    },
    BuiltinPattern {
        name: "credit_card",
        category: "PII:CREDIT_CARD",
        group: PatternGroup::Pii,
        severity: Severity::Redact,
        pattern: r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
        validation: Validation::CreditCard,
    },
    // --- Secrets ---
    BuiltinPattern {
        name: "aws_access_key",
        category: "SECRET:AWS_KEY",
        group: PatternGroup::Secret,
        severity: Severity::Redact,
        pattern: r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "github_token",
        category: "SECRET:GITHUB_TOKEN",
        group: PatternGroup::Secret,
        severity: Severity::Redact,
        pattern: r"\bghp_[A-Za-z0-9]{36}\b",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "api_key",
        category: "SECRET:API_KEY",
        group: PatternGroup::Secret,
        severity: Severity::Redact,
        pattern: r"\bsk-[A-Za-z0-9_-]{20,}\b",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "private_key",
        category: "SECRET:PRIVATE_KEY",
        group: PatternGroup::Secret,
        severity: Severity::Redact,
        pattern: r"-----BEGIN [A-Z ]*PRIVATE KEY-----",
        validation: Validation::None,
    },
    // --- Injection phrasings ---
    BuiltinPattern {
        name: "ignore_instructions",
        category: "Injection:Override",
        group: PatternGroup::Injection,
        severity: Severity::Block,
        pattern: r"(?i)ignore\s+(?:all\s+)?(?:previous|prior|above|earlier)\s+(?:instructions|prompts|directives|rules)",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "system_prompt_override",
        category: "Injection:SystemPrompt",
        group: PatternGroup::Injection,
        severity: Severity::Block,
        pattern: r"(?i)(?:new|updated|revised)\s+system\s+(?:prompt|instructions|message)",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "dan_mode",
        category: "Injection:Jailbreak",
        group: PatternGroup::Injection,
        severity: Severity::Block,
        pattern: r"(?i)\bDAN\s+mode\b|(?i)\bdo\s+anything\s+now\b",
        validation: Validation::None,
    },
    BuiltinPattern {
        name: "instruction_delimiters",
        category: "Injection:Delimiter",
        group: PatternGroup::Injection,
        severity: Severity::Block,
        pattern: r"(?i)<\|?(?:system|im_start|endoftext)\|?>|\[INST\]|<<SYS>>",
        validation: Validation::None,
    },
];

lazy_static! {
    /// A thread-safe, global cache of compiled built-in patterns, keyed by
    /// pattern name.
    static ref COMPILED_PATTERN_CACHE: RwLock<HashMap<&'static str, Arc<CompiledPattern>>> =
        RwLock::new(HashMap::new());
}

/// Look up a built-in pattern by name.
pub fn lookup(name: &str) -> Option<&'static BuiltinPattern> {
    BUILTIN_PATTERNS.iter().find(|p| p.name == name)
}

/// Names of every pattern in `group`, in table order.
pub fn names_in_group(group: PatternGroup) -> Vec<&'static str> {
    BUILTIN_PATTERNS
        .iter()
        .filter(|p| p.group == group)
        .map(|p| p.name)
        .collect()
}

/// Get a compiled pattern from the cache, compiling on first use.
pub fn get_or_compile(spec: &BuiltinPattern) -> Result<Arc<CompiledPattern>, SentinelError> {
    {
        let cache = COMPILED_PATTERN_CACHE
            .read()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(compiled) = cache.get(spec.name) {
            return Ok(Arc::clone(compiled));
        }
    }

    if spec.pattern.len() > MAX_PATTERN_LENGTH {
        return Err(SentinelError::Fatal(format!(
            "pattern '{}' exceeds maximum length ({} > {})",
            spec.name,
            spec.pattern.len(),
            MAX_PATTERN_LENGTH
        )));
    }

    let regex = RegexBuilder::new(spec.pattern)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| SentinelError::PatternCompilationError(spec.name.to_string(), e))?;

    debug!("Compiled built-in pattern '{}'.", spec.name);
    let compiled = Arc::new(CompiledPattern { spec: *spec, regex });
    COMPILED_PATTERN_CACHE
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .insert(spec.name, Arc::clone(&compiled));
    Ok(compiled)
}

/// Resolve and compile a set of pattern names. Unknown names are a
/// configuration fault attributed to `profile_name`.
pub fn compile_named(
    profile_name: &str,
    names: &[String],
) -> Result<Vec<Arc<CompiledPattern>>, SentinelError> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let spec = lookup(name).ok_or_else(|| {
            SentinelError::UnknownPattern(profile_name.to_string(), name.clone())
        })?;
        out.push(get_or_compile(spec)?);
    }
    Ok(out)
}
