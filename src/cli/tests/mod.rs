//! Unit tests for CLI module
//!
//! Tests command registry, argument handling and formatting. No subtitle
//! helper or session is started.

use std::sync::Arc;

use toml::Value;

use crate::{
    cli::{
        CliError, CommandRegistry,
        formatting::{Colors, LABEL_WIDTH, format_label, format_playback, format_toml_value},
    },
    config::Config,
    services::sync::{MediaSource, PlayerState},
};

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new(Arc::new(Config::default()));
    registry.register_all_commands();
    registry
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn format_toml_value_scalars() {
    assert_eq!(format_toml_value(&Value::String("hello world".to_string())), "\"hello world\"");
    assert_eq!(format_toml_value(&Value::Integer(-123)), "-123");
    assert_eq!(format_toml_value(&Value::Float(std::f64::consts::PI)), "3.141592653589793");
    assert_eq!(format_toml_value(&Value::Boolean(false)), "false");
}

#[test]
fn format_toml_value_collections_show_size() {
    let value = Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
    assert_eq!(format_toml_value(&value), "[3]");

    let mut table = toml::map::Map::new();
    table.insert("key1".to_string(), Value::String("value1".to_string()));
    table.insert("key2".to_string(), Value::Integer(42));
    assert_eq!(format_toml_value(&Value::Table(table)), "{2}");

    assert_eq!(format_toml_value(&Value::Table(toml::map::Map::new())), "{0}");
}

#[test]
fn transcript_labels_pad_inside_the_styling() {
    let label = format_label("main");

    let inner = label
        .strip_suffix(Colors::RESET)
        .and_then(|rest| rest.rsplit('\x1b').next())
        .and_then(|rest| rest.split_once('m'))
        .map(|(_, text)| text);
    assert_eq!(inner.map(str::len), Some(LABEL_WIDTH));
    assert_eq!(inner.map(str::trim_end), Some("main"));
}

#[test]
fn playback_shows_clock_time_and_state() {
    let mut state = PlayerState::default();
    state.load(MediaSource::new("file:///movie.mp4"));
    state.current_time = 65.9;
    assert_eq!(format_playback(&state), "1:05 paused");

    state.is_playing = true;
    assert_eq!(format_playback(&state), "1:05 playing");
}

#[test]
fn command_registry_starts_empty() {
    let registry = CommandRegistry::new(Arc::new(Config::default()));

    assert!(registry.get_categories().is_empty());
}

#[test]
fn all_categories_are_registered() {
    let registry = registry();

    assert_eq!(
        registry.get_categories(),
        vec!["config", "geometry", "session", "subtitles"]
    );

    let commands = registry.list_commands();
    let (_, geometry) = commands
        .iter()
        .find(|(category, _)| category == "geometry")
        .unwrap();
    assert_eq!(geometry, &vec!["clamp", "fit", "place"]);
}

#[tokio::test]
async fn config_get_reads_dotted_path() {
    let output = registry()
        .execute("config", "get", &args(&["sync.drift_epsilon"]))
        .await
        .unwrap();

    assert_eq!(output, "sync.drift_epsilon: 0.5");
}

#[tokio::test]
async fn config_get_unknown_path_fails() {
    let result = registry()
        .execute("config", "get", &args(&["sync.nope"]))
        .await;

    assert!(matches!(result, Err(CliError::ConfigError(_))));
}

#[tokio::test]
async fn config_show_round_trips() {
    let output = registry().execute("config", "show", &[]).await.unwrap();

    assert_eq!(Config::from_toml_str(&output).unwrap(), Config::default());
}

#[tokio::test]
async fn config_schema_is_json() {
    let output = registry().execute("config", "schema", &[]).await.unwrap();

    let schema: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(schema["properties"]["miniplayer"].is_object());
}

#[tokio::test]
async fn geometry_clamp_keeps_window_on_screen() {
    let output = registry()
        .execute("geometry", "clamp", &args(&["2420", "-200"]))
        .await
        .unwrap();

    assert!(output.contains("-> (1600, 0)"), "{output}");
}

#[tokio::test]
async fn geometry_fit_locks_aspect_ratio() {
    let registry = registry();

    let output = registry
        .execute("geometry", "fit", &args(&["400", "4:3"]))
        .await
        .unwrap();
    assert_eq!(output, "400x300 (minimum 200x150)");

    let output = registry
        .execute("geometry", "fit", &args(&["120", "2"]))
        .await
        .unwrap();
    assert_eq!(output, "200x100 (minimum 200x100)");
}

#[tokio::test]
async fn geometry_place_defaults_to_top_right() {
    let registry = registry();

    let output = registry.execute("geometry", "place", &[]).await.unwrap();
    assert_eq!(output, "320x180 at (1580, 20)");

    let output = registry
        .execute("geometry", "place", &args(&["100", "100"]))
        .await
        .unwrap();
    assert_eq!(output, "320x180 at (100, 100)");
}

#[tokio::test]
async fn invalid_number_names_the_argument() {
    let result = registry()
        .execute("geometry", "clamp", &args(&["left", "0"]))
        .await;

    match result {
        Err(CliError::InvalidArgument { arg, .. }) => assert_eq!(arg, "x"),
        other => panic!("expected invalid argument, got {other:?}"),
    }
}

#[tokio::test]
async fn argument_count_is_checked() {
    let registry = registry();

    let result = registry.execute("geometry", "fit", &args(&["400"])).await;
    assert!(matches!(result, Err(CliError::InvalidArguments(_))));

    let result = registry
        .execute("config", "show", &args(&["extra"]))
        .await;
    assert!(matches!(result, Err(CliError::InvalidArguments(_))));
}

#[tokio::test]
async fn unknown_commands_are_reported() {
    let registry = registry();

    let result = registry.execute("audio", "volume", &[]).await;
    assert!(matches!(result, Err(CliError::CommandNotFound(_))));

    let result = registry.execute("config", "set", &[]).await;
    assert!(matches!(result, Err(CliError::CommandNotFound(_))));
}

#[tokio::test]
async fn help_lists_categories_and_commands() {
    let registry = registry();

    let help = registry.execute("help", "", &[]).await.unwrap();
    assert!(help.contains("geometry"));
    assert!(help.contains("subtitles"));

    let help = registry.execute("geometry", "", &[]).await.unwrap();
    assert!(help.contains("clamp"));
    assert!(help.contains("miniplay geometry fit 400 4:3"));
}
