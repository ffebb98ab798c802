// sentinel-core/tests/profile_tests.rs
//! Integration tests for profile loading and validation.

use std::io::Write;

use sentinel_core::{DetectorKind, DetectorSpec, Profile};

fn write_temp_profile(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test_log::test]
fn loads_profile_from_file() {
    let file = write_temp_profile(
        r#"
name: strict
description: Strict gateway profile.
detectors:
  - kind: regex
    patterns: ["email", "aws_access_key"]
  - kind: injection
  - kind: semantic
    threshold: 0.25
    forbidden_intents:
      - "money laundering"
stream:
  max_buffer: 1024
"#,
    );

    let profile = Profile::load_from_file(file.path()).unwrap();
    assert_eq!(profile.name, "strict");
    assert_eq!(profile.stream.max_buffer, 1024);
    assert_eq!(profile.detectors.len(), 3);

    match profile.spec_for(DetectorKind::Semantic).unwrap() {
        DetectorSpec::Semantic { threshold, forbidden_intents, .. } => {
            assert_eq!(*threshold, 0.25);
            assert_eq!(forbidden_intents, &["money laundering".to_string()]);
        }
        other => panic!("unexpected spec: {other:?}"),
    }
}

#[test_log::test]
fn missing_file_is_an_error() {
    let result = Profile::load_from_file(std::path::Path::new("/nonexistent/profile.yaml"));
    assert!(result.is_err());
}

#[test_log::test]
fn malformed_yaml_is_an_error() {
    let file = write_temp_profile("name: [unclosed");
    assert!(Profile::load_from_file(file.path()).is_err());
}

#[test_log::test]
fn invalid_profile_fails_at_load_not_later() {
    let file = write_temp_profile(
        r#"
name: broken
detectors:
  - kind: semantic
    threshold: 2.0
"#,
    );
    let err = Profile::load_from_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("threshold"));
}

#[test_log::test]
fn zero_max_buffer_rejected() {
    let file = write_temp_profile("name: zero\nstream:\n  max_buffer: 0\n");
    assert!(Profile::load_from_file(file.path()).is_err());
}

#[test_log::test]
fn default_profile_enables_baseline_detectors() {
    let profile = Profile::load_default().unwrap();
    let enabled: Vec<_> = profile
        .detectors
        .iter()
        .filter(|s| s.enabled())
        .map(|s| s.kind())
        .collect();
    assert!(enabled.contains(&DetectorKind::Regex));
    assert!(enabled.contains(&DetectorKind::Injection));
    assert!(enabled.contains(&DetectorKind::Pii));
    assert!(!enabled.contains(&DetectorKind::Semantic));
}
