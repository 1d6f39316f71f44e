//! Tests for loading client configuration.

use othello_client::{ClientConfig, Sentinels};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("othello_client.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_defaults_match_reference_server() {
    let config = ClientConfig::default();
    assert_eq!(config.server_url(), "http://localhost:8080");
    assert_eq!(config.sentinels(), &Sentinels::default());
    assert_eq!(config.sentinels().black(), "x");
    assert_eq!(config.sentinels().pass(), "you pass");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"server_url = "http://game.local:9000"
max_consecutive_passes = 10

[sentinels]
pass = "pass"
"#,
    );

    let config = ClientConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.server_url(), "http://game.local:9000");
    assert_eq!(*config.max_consecutive_passes(), 10);
    assert_eq!(*config.refresh_retries(), 1);
    assert_eq!(config.sentinels().pass(), "pass");
    assert_eq!(config.sentinels().rejected(), "0");
}

#[test]
fn test_invalid_toml_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "this is not valid toml !!!@@@");
    assert!(ClientConfig::from_file(&path).is_err());
}

#[test]
fn test_same_color_codes_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"[sentinels]
black = "o"
white = "o"
"#,
    );
    let err = ClientConfig::from_file(&path).expect_err("codes must differ");
    assert!(err.message.contains("differ"));
}

#[test]
fn test_non_http_url_rejected() {
    let config = ClientConfig::default().with_server_url("localhost:8080");
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = ClientConfig::load_or_default(dir.path().join("absent.toml"))
        .expect("Missing file is not an error");
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_server_override() {
    let config = ClientConfig::default()
        .with_server_override(Some("http://other:1234".to_string()))
        .with_server_override(None)
        .with_server_override(Some("  ".to_string()));
    assert_eq!(config.server_url(), "http://other:1234");
}

#[test]
fn test_color_codes_must_be_url_safe() {
    for code in ["a&b", "#", "x o", "é"] {
        let sentinels = Sentinels::new(
            code.to_string(),
            "o".to_string(),
            "0".to_string(),
            "you pass".to_string(),
        );
        let config = ClientConfig::default().with_sentinels(sentinels);
        let err = config.validate().expect_err("unsafe code accepted");
        assert!(err.message.contains("color code"), "{}", err.message);
    }

    let sentinels = Sentinels::new(
        "B-1".to_string(),
        "w_2.~".to_string(),
        "illegal move".to_string(),
        "you pass".to_string(),
    );
    assert!(ClientConfig::default().with_sentinels(sentinels).validate().is_ok());
}
