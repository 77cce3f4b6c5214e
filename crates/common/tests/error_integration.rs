//! Integration tests for `cacheable_common::error`.
//!
//! These suites validate classification and label contracts so downstream
//! crates receive consistent failure semantics.

use std::io;

use cacheable_common::error::{CacheError, CacheResult, ErrorClassification, ErrorSeverity};

/// Validates that every `CacheError` variant surfaces the expected retryable,
/// severity, criticality and label combination.
#[test]
fn classification_matrix_matches_expected_contract() {
    let cases = vec![
        (CacheError::store("get", "k", "reset"), true, ErrorSeverity::Warning, false, "store"),
        (
            CacheError::compute("k", io::Error::new(io::ErrorKind::Other, "boom")),
            false,
            ErrorSeverity::Error,
            false,
            "compute",
        ),
        (CacheError::serialization("JSON", "bad"), false, ErrorSeverity::Error, false, "serialization"),
        (CacheError::invalid_key("empty"), false, ErrorSeverity::Error, false, "invalid_key"),
        (CacheError::config("missing"), false, ErrorSeverity::Error, false, "config"),
        (CacheError::AlreadyInstalled, false, ErrorSeverity::Warning, false, "already_installed"),
        (CacheError::NotInstalled, false, ErrorSeverity::Critical, true, "not_installed"),
    ];

    for (err, retryable, severity, critical, label) in cases {
        assert_eq!(err.is_retryable(), retryable, "retryable mismatch for {err}");
        assert_eq!(err.severity(), severity, "severity mismatch for {err}");
        assert_eq!(err.is_critical(), critical, "critical mismatch for {err}");
        assert_eq!(err.label(), label);
    }
}

/// Validates that `?` converts serde_json failures into `CacheError`.
#[test]
fn serde_json_errors_convert_through_question_mark() {
    fn parse(input: &str) -> CacheResult<serde_json::Value> {
        Ok(serde_json::from_str(input)?)
    }

    let err = parse("{oops").unwrap_err();
    assert_eq!(err.label(), "serialization");
    assert!(err.to_string().starts_with("Serialization error (JSON):"));
}

/// Validates that errors from anyhow-style boxed sources are accepted by
/// `CacheError::compute`.
#[test]
fn compute_accepts_boxed_sources() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = "upstream unavailable".into();
    let err = CacheError::compute("orders@1", boxed);

    assert_eq!(err.key(), Some("orders@1"));
    assert_eq!(err.to_string(), "Computation for key 'orders@1' failed: upstream unavailable");
}
