//! Tests for logging initialization
//!
//! Only one global subscriber can be installed per process, so later calls
//! are expected to fail gracefully rather than panic.

use exchange_explorer::core::logging::{init_logging, LogFormat, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    assert_eq!(LogFormat::variants(), &["compact", "pretty", "json"]);
}

#[test]
fn test_env_variable_names() {
    assert_eq!(LOG_LEVEL_ENV, "EXPLORER_LOG_LEVEL");
    assert_eq!(LOG_FORMAT_ENV, "EXPLORER_LOG_FORMAT");
}

#[test]
fn test_init_logging_with_levels_and_formats() {
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("warn"), Some("pretty"));
    let _ = init_logging(Some("off"), Some("json"));
    let _ = init_logging(None, None);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}
