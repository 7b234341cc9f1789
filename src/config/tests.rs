//! Configuration tests
//!
//! The round-trip tests guard `to_toml()`: a field added to `Config` but not
//! to the template shows up here as a mismatch.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(toml_str: &str) -> FileConfig {
    toml::from_str(toml_str).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let reloaded = Config::from_layers(parsed.unwrap(), no_env).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.telemetry.buffer_capacity = 200;
    config.telemetry.scroll_debounce_ms = 120;
    config.telemetry.trace_events = false;
    config.telemetry.trace_preview_bytes = 64;
    config.aggregation.key_field = "sku".to_string();
    config.aggregation.price_field = "unit_price".to_string();
    config.aggregation.quantity_field = "on_hand".to_string();
    config.aggregation.stock_field = "available".to_string();
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_dir = PathBuf::from("/var/log/gridspy");
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "grid".to_string();

    let reloaded = Config::from_layers(parse(&config.to_toml()), no_env).unwrap();
    assert_eq!(reloaded, config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.telemetry.buffer_capacity, 50);
    assert_eq!(config.telemetry.scroll_debounce_ms, 300);
    assert!(config.telemetry.trace_events);
    assert_eq!(config.aggregation.key_field, "id");
    assert_eq!(config.aggregation.stock_field, "inStock");
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.file_enabled);
    assert_eq!(config.logging.file_prefix, "gridspy");
}

#[test]
fn test_empty_file_yields_defaults() {
    let config = Config::from_layers(parse(""), no_env).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let file = parse(
        r#"
[telemetry]
buffer_capacity = 10

[aggregation]
price_field = "cost"
"#,
    );
    let config = Config::from_layers(file, no_env).unwrap();

    assert_eq!(config.telemetry.buffer_capacity, 10);
    assert_eq!(config.telemetry.scroll_debounce_ms, 300);
    assert_eq!(config.aggregation.price_field, "cost");
    assert_eq!(config.aggregation.key_field, "id");
}

#[test]
fn test_rotation_parsing() {
    assert_eq!("HOURLY".parse::<LogRotation>().unwrap(), LogRotation::Hourly);
    assert_eq!(" never ".parse::<LogRotation>().unwrap(), LogRotation::Never);
    assert!("weekly".parse::<LogRotation>().is_err());
}

#[test]
fn test_unknown_rotation_is_an_error() {
    let file = parse(
        r#"
[logging]
file_rotation = "weekly"
"#,
    );
    let err = Config::from_layers(file, no_env).unwrap_err();
    assert!(format!("{:#}", err).contains("weekly"));
}

#[test]
fn test_log_level_normalized_and_validated() {
    let file = parse(
        r#"
[logging]
level = "DEBUG"
"#,
    );
    let config = Config::from_layers(file, no_env).unwrap();
    assert_eq!(config.logging.level, "debug");

    let file = parse(
        r#"
[logging]
level = "chatty"
"#,
    );
    let err = Config::from_layers(file, no_env).unwrap_err();
    assert!(format!("{:#}", err).contains("chatty"));
}

#[test]
fn test_empty_log_prefix_is_an_error() {
    let file = parse(
        r#"
[logging]
file_prefix = "  "
"#,
    );
    assert!(Config::from_layers(file, no_env).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Environment precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
[telemetry]
buffer_capacity = 10
scroll_debounce_ms = 100
"#,
    );
    let env: HashMap<&str, &str> = [(ENV_BUFFER_CAPACITY, "75"), (ENV_SCROLL_DEBOUNCE_MS, " 500 ")]
        .into_iter()
        .collect();

    let config = Config::from_layers(file, |k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(config.telemetry.buffer_capacity, 75);
    assert_eq!(config.telemetry.scroll_debounce_ms, 500);
}

#[test]
fn test_invalid_env_value_is_an_error() {
    let err = Config::from_layers(FileConfig::default(), |k| {
        (k == ENV_BUFFER_CAPACITY).then(|| "lots".to_string())
    })
    .unwrap_err();
    assert!(err.to_string().contains(ENV_BUFFER_CAPACITY));
}

// ─────────────────────────────────────────────────────────────────────────────
// File loading
// ─────────────────────────────────────────────────────────────────────────────

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("gridspy-config-test-{}-{}", std::process::id(), name))
        .join("config.toml")
}

#[test]
fn test_missing_file_yields_defaults() {
    let path = temp_path("missing");
    let file = Config::load_file_config(&path).unwrap();
    assert!(file.telemetry.is_none());
    assert!(file.logging.is_none());
}

#[test]
fn test_malformed_file_reports_path() {
    let path = temp_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[telemetry\nbuffer_capacity = ").unwrap();

    let err = Config::load_file_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains(&path.display().to_string()));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_write_default_then_load() {
    let path = temp_path("write-default");
    Config::write_default(&path).unwrap();

    let file = Config::load_file_config(&path).unwrap();
    let config = Config::from_layers(file, no_env).unwrap();
    assert_eq!(config, Config::default());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
