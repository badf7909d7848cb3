//! Unit tests for config module
//!
//! Tests configuration types, defaults, and serialization.
//! No filesystem dependencies - all in-memory.

use std::time::Duration;

use crate::config::{Config, ConfigPaths, DRIFT_EPSILON, LogLevel, SYNC_INTERVAL};

#[test]
fn config_default_matches_protocol_constants() {
    let config = Config::default();

    assert_eq!(config.sync.interval(), SYNC_INTERVAL);
    assert_eq!(config.sync.epsilon(), DRIFT_EPSILON);
    assert_eq!(config.miniplayer.width, 320);
    assert_eq!(config.miniplayer.height, 180);
    assert_eq!(config.miniplayer.min_width, 200);
    assert!(config.miniplayer.always_on_top);
    assert!(config.miniplayer.frameless);
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = config.to_toml_string().unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[sync]"));
    assert!(toml_str.contains("[miniplayer]"));
}

#[test]
fn config_deserialize_partial_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [sync]
        drift_epsilon = 0.25
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.sync.drift_epsilon, 0.25);
    assert_eq!(config.sync.interval_ms, 1000);
    assert_eq!(config.miniplayer, Default::default());
}

#[test]
fn config_serialize_roundtrip() {
    let mut original = Config::default();
    original.miniplayer.edge_margin = 48;
    original.subtitles.output_dir = Some("/tmp/subs".into());

    let toml_str = original.to_toml_string().unwrap();
    let deserialized = Config::from_toml_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_rejects_zero_interval() {
    let result = Config::from_toml_str("[sync]\ninterval_ms = 0\n");
    assert!(result.is_err());
}

#[test]
fn config_rejects_negative_epsilon() {
    let result = Config::from_toml_str("[sync]\ndrift_epsilon = -1.0\n");
    assert!(result.is_err());
}

#[test]
fn config_short_interval_is_floored() {
    let config = Config::from_toml_str("[sync]\ninterval_ms = 1\n").unwrap();
    assert_eq!(config.sync.interval(), Duration::from_millis(10));
}

#[test]
fn value_at_resolves_dotted_paths() {
    let config = Config::default();

    let epsilon = config.value_at("sync.drift_epsilon").unwrap();
    assert_eq!(epsilon.as_float(), Some(0.5));

    let level = config.value_at("general.log_level").unwrap();
    assert_eq!(level.as_str(), Some("info"));

    assert!(config.value_at("sync.nope").is_err());
}

#[test]
fn schema_lists_sections() {
    let schema = Config::json_schema();
    let properties = schema.get("properties").unwrap();

    for section in ["general", "sync", "miniplayer", "subtitles"] {
        assert!(properties.get(section).is_some(), "missing {section}");
    }
}

#[test]
fn log_level_display() {
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::default().as_directive(), "info");
}

#[test]
fn config_paths_valid() {
    if let Ok(dir) = ConfigPaths::config_dir() {
        assert!(dir.ends_with("miniplay"));
    }
    if let Ok(path) = ConfigPaths::main_config() {
        assert!(path.ends_with("miniplay/config.toml"));
    }
}
