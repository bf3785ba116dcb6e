use std::io::Write;
use tersify::config::{ConfigError, RuntimeMode};
use tersify::Config;

#[test]
fn test_defaults_match_hosted_service() {
    let config = Config::default();

    assert_eq!(config.runtime.mode, RuntimeMode::Production);
    assert_eq!(config.runtime.origin, "http://localhost:3000");
    assert_eq!(config.summary.path, "/api/summary_gen");
    assert_eq!(config.summary.default_instruction, "Create a comprehensive summary");
    assert_eq!(config.summary.timeout_secs, 30);
    assert_eq!(config.email.endpoint, "/api/sendEmail");
    assert_eq!(config.email.subject, "AI Generated Summary");
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let config = Config::parse(
        r#"
[runtime]
mode = "development"

[summary]
timeout_secs = 5
"#,
    )
    .unwrap();

    assert_eq!(config.runtime.mode, RuntimeMode::Development);
    assert_eq!(config.summary.timeout_secs, 5);
    assert_eq!(config.summary.path, "/api/summary_gen");
    assert_eq!(config.email.subject, "AI Generated Summary");
}

#[test]
fn test_load_from_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[email]
subject = "Weekly digest"
"#
    )
    .unwrap();

    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.email.subject, "Weekly digest");
}

#[test]
fn test_invalid_mode_is_rejected() {
    let err = Config::parse("[runtime]\nmode = \"staging\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_bad_origin_is_reported() {
    let mut config = Config::default();
    config.runtime.origin = "not a url".to_string();

    assert!(matches!(config.origin(), Err(ConfigError::InvalidOrigin(..))));
}

#[test]
fn test_zero_timeout_is_rejected_on_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[summary]\ntimeout_secs = 0").unwrap();

    let err = Config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroTimeout));
    assert!(Config::default().validate().is_ok());
}
