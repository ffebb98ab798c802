// sentinel-core/src/profile.rs
//! Profile definitions: the declarative configuration an engine is compiled
//! from.
//!
//! A profile names the detectors to enable and their tuning. Profiles are
//! validated hard at load: an invalid profile never produces a partially
//! configured engine, the load fails instead.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detector::DetectorKind;
use crate::detectors::patterns;
use crate::errors::SentinelError;

/// The embedded baseline profile, compiled into the binary.
const DEFAULT_PROFILE_YAML: &str = include_str!("../config/default_profile.yaml");

fn default_enabled() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    0.5
}

fn default_threshold() -> f64 {
    0.8
}

/// Configuration for one detector slot. Tagged by `kind` in YAML; at most
/// one spec per kind is allowed in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorSpec {
    Regex {
        #[serde(default = "default_enabled")]
        enabled: bool,
        /// Built-in pattern names; empty selects the secret-shape defaults.
        #[serde(default)]
        patterns: Vec<String>,
    },
    Injection {
        #[serde(default = "default_enabled")]
        enabled: bool,
    },
    Pii {
        #[serde(default = "default_enabled")]
        enabled: bool,
        /// Entities below this confidence are ignored.
        #[serde(default = "default_min_confidence")]
        min_confidence: f64,
        /// Fallback pattern names; empty selects the PII defaults.
        #[serde(default)]
        patterns: Vec<String>,
        /// Fail closed when the recognizer backend is unavailable.
        #[serde(default)]
        required: bool,
    },
    Semantic {
        #[serde(default = "default_enabled")]
        enabled: bool,
        /// Cosine similarity at or above this value blocks.
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default)]
        forbidden_intents: Vec<String>,
        /// Keywords blocked by case-insensitive substring match, no
        /// embedding needed.
        #[serde(default)]
        blacklist: Vec<String>,
        /// Fail profile compilation when no embedding provider is available.
        #[serde(default)]
        required: bool,
    },
    Plugin {
        #[serde(default = "default_enabled")]
        enabled: bool,
        /// Registered plugin names, evaluated in list order.
        #[serde(default)]
        modules: Vec<String>,
    },
}

impl DetectorSpec {
    pub fn kind(&self) -> DetectorKind {
        match self {
            DetectorSpec::Regex { .. } => DetectorKind::Regex,
            DetectorSpec::Injection { .. } => DetectorKind::Injection,
            DetectorSpec::Pii { .. } => DetectorKind::Pii,
            DetectorSpec::Semantic { .. } => DetectorKind::Semantic,
            DetectorSpec::Plugin { .. } => DetectorKind::Plugin,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            DetectorSpec::Regex { enabled, .. }
            | DetectorSpec::Injection { enabled }
            | DetectorSpec::Pii { enabled, .. }
            | DetectorSpec::Semantic { enabled, .. }
            | DetectorSpec::Plugin { enabled, .. } => *enabled,
        }
    }
}

/// Stream sanitizer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Buffered bytes above which a sentence boundary is forced.
    #[serde(default = "StreamConfig::default_max_buffer")]
    pub max_buffer: usize,
}

impl StreamConfig {
    fn default_max_buffer() -> usize {
        4096
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { max_buffer: Self::default_max_buffer() }
    }
}

/// A named validation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detectors: Vec<DetectorSpec>,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Profile {
    /// Parse a profile from YAML and validate it.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let profile: Profile =
            serde_yml::from_str(content).context("Failed to parse profile YAML")?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading profile from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid profile file: {}", path.display()))
    }

    /// The embedded baseline profile.
    pub fn load_default() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_PROFILE_YAML).context("Embedded default profile is invalid")
    }

    /// Structural validation: unique detector kinds, in-range tuning values
    /// and known pattern names. Plugin module registration is checked at
    /// engine compile time, when a registry is in scope.
    pub fn validate(&self) -> Result<(), SentinelError> {
        let invalid = |msg: String| SentinelError::InvalidProfile(self.name.clone(), msg);

        if self.name.trim().is_empty() {
            return Err(invalid("profile name must not be empty".to_string()));
        }
        if self.stream.max_buffer == 0 {
            return Err(invalid("stream.max_buffer must be greater than zero".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &self.detectors {
            if !seen.insert(spec.kind()) {
                return Err(invalid(format!("duplicate detector kind '{}'", spec.kind())));
            }

            match spec {
                DetectorSpec::Regex { patterns: names, .. }
                | DetectorSpec::Pii { patterns: names, .. } => {
                    for name in names {
                        if patterns::lookup(name).is_none() {
                            return Err(SentinelError::UnknownPattern(
                                self.name.clone(),
                                name.clone(),
                            ));
                        }
                    }
                }
                DetectorSpec::Semantic { threshold, .. } => {
                    if !(0.0..=1.0).contains(threshold) {
                        return Err(invalid(format!(
                            "semantic threshold {} is outside [0, 1]",
                            threshold
                        )));
                    }
                }
                _ => {}
            }

            if let DetectorSpec::Pii { min_confidence, .. } = spec {
                if !(0.0..=1.0).contains(min_confidence) {
                    return Err(invalid(format!(
                        "pii min_confidence {} is outside [0, 1]",
                        min_confidence
                    )));
                }
            }
        }

        Ok(())
    }

    /// The spec for `kind`, if the profile carries one.
    pub fn spec_for(&self, kind: DetectorKind) -> Option<&DetectorSpec> {
        self.detectors.iter().find(|s| s.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_loads_and_validates() {
        let profile = Profile::load_default().unwrap();
        assert_eq!(profile.name, "default");
        assert!(profile.spec_for(DetectorKind::Regex).is_some());
        assert!(profile.spec_for(DetectorKind::Injection).is_some());
    }

    #[test]
    fn test_parse_with_defaults() {
        let yaml = r#"
name: minimal
detectors:
  - kind: semantic
    forbidden_intents: ["launder money"]
"#;
        let profile = Profile::from_yaml_str(yaml).unwrap();
        match profile.spec_for(DetectorKind::Semantic).unwrap() {
            DetectorSpec::Semantic { enabled, threshold, required, .. } => {
                assert!(*enabled);
                assert_eq!(*threshold, 0.8);
                assert!(!*required);
            }
            other => panic!("unexpected spec: {other:?}"),
        }
        assert_eq!(profile.stream.max_buffer, 4096);
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let yaml = r#"
name: dup
detectors:
  - kind: regex
  - kind: regex
"#;
        assert!(Profile::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let yaml = r#"
name: bad
detectors:
  - kind: semantic
    threshold: 1.5
"#;
        assert!(Profile::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_pattern_name_rejected() {
        let yaml = r#"
name: bad
detectors:
  - kind: regex
    patterns: ["no_such_pattern"]
"#;
        assert!(Profile::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_empty_detector_list_is_valid() {
        let profile = Profile::from_yaml_str("name: empty\ndetectors: []\n").unwrap();
        assert!(profile.detectors.is_empty());
    }
}
