//! Configuration Tests

use beanwire_domain::error::Error;
use beanwire_infrastructure::config::{AppConfig, ConfigLoader};
use beanwire_infrastructure::constants::{CONVERSATION_REAPER_INTERVAL_MS, DEFAULT_LOG_LEVEL};
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Helper to set env var safely
fn set_env(key: &str, value: &str) {
    // SAFETY: every test uses its own variable names
    unsafe {
        env::set_var(key, value);
    }
}

/// Helper to remove env var safely
fn remove_env(key: &str) {
    // SAFETY: every test uses its own variable names
    unsafe {
        env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("beanwire.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert!(config.events.resolution_cache);
    assert!(config.contexts.validate_passivation);
    assert_eq!(config.conversation.default_timeout_ms, 600_000);
    assert_eq!(config.conversation.concurrent_access_timeout_ms, 1_000);
    assert_eq!(
        config.conversation.reaper_interval_ms,
        CONVERSATION_REAPER_INTERVAL_MS
    );
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(!config.logging.json_format);
    assert!(config.logging.file_output.is_none());
}

#[test]
fn test_conversation_settings_conversion() {
    let config = AppConfig::default();
    let settings = config.conversation.settings();
    assert_eq!(settings.default_timeout, Duration::from_secs(600));
    assert_eq!(settings.concurrent_access_timeout, Duration::from_secs(1));
    assert_eq!(config.conversation.reaper_interval(), Duration::from_secs(60));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[events]
resolution_cache = false

[conversation]
concurrent_access_timeout_ms = 0

[logging]
level = "debug"
json_format = true
"#,
    );

    let config = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_FILE")
        .with_config_path(&path)
        .load()
        .unwrap();

    assert!(!config.events.resolution_cache);
    assert_eq!(config.conversation.concurrent_access_timeout_ms, 0);
    assert_eq!(config.conversation.default_timeout_ms, 600_000);
    assert!(config.contexts.validate_passivation);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_MISSING")
        .with_config_path(dir.path().join("absent.toml"));

    let config = loader.load().unwrap();

    assert_eq!(config, AppConfig::default());
    assert!(loader.config_path().unwrap().ends_with("absent.toml"));
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[conversation]\ndefault_timeout_ms = 5000\n");
    set_env("BEANWIRE_TEST_ENV_CONVERSATION__DEFAULT_TIMEOUT_MS", "7000");
    set_env("BEANWIRE_TEST_ENV_CONTEXTS__VALIDATE_PASSIVATION", "false");

    let result = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_ENV")
        .with_config_path(&path)
        .load();

    remove_env("BEANWIRE_TEST_ENV_CONVERSATION__DEFAULT_TIMEOUT_MS");
    remove_env("BEANWIRE_TEST_ENV_CONTEXTS__VALIDATE_PASSIVATION");
    let config = result.unwrap();
    assert_eq!(config.conversation.default_timeout_ms, 7000);
    assert!(!config.contexts.validate_passivation);
}

#[test]
fn test_zero_default_timeout_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[conversation]\ndefault_timeout_ms = 0\n");

    let result = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_ZERO_TIMEOUT")
        .with_config_path(&path)
        .load();

    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_zero_reaper_interval_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[conversation]\nreaper_interval_ms = 0\n");

    let result = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_ZERO_REAPER")
        .with_config_path(&path)
        .load();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("reaper interval"));
}

#[test]
fn test_invalid_log_level_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"loud\"\n");

    let result = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_LEVEL")
        .with_config_path(&path)
        .load();

    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_malformed_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[conversation]\ndefault_timeout_ms = \"soon\"\n");

    let result = ConfigLoader::new()
        .with_env_prefix("BEANWIRE_TEST_MALFORMED")
        .with_config_path(&path)
        .load();

    match result {
        Err(Error::Configuration { message, source }) => {
            assert!(message.contains("Failed to extract configuration"));
            assert!(source.is_some());
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut config = AppConfig::default();
    config.conversation.default_timeout_ms = 42_000;
    config.logging.file_output = Some(dir.path().join("beanwire.log"));

    let loader = ConfigLoader::new().with_env_prefix("BEANWIRE_TEST_SAVE");
    loader.save_to_file(&config, &path).unwrap();
    let reloaded = loader.with_config_path(&path).load().unwrap();

    assert_eq!(reloaded, config);
}
