//! Terminal output for miniplay commands.
//!
//! Help text styling plus the shapes every command prints: window
//! placements as `WxH at (x, y)`, playback as `m:ss playing`, and config
//! values.

use toml::Value;

use crate::services::{
    geometry::{Position, Size},
    sync::{PlayerState, format_time},
};

/// Width of the label column in session transcripts
pub const LABEL_WIDTH: usize = 12;

/// ANSI escape codes used by the CLI
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim
    pub const DIM: &'static str = "\x1b[2m";

    /// Red
    pub const RED: &'static str = "\x1b[31m";
    /// Green
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Blue
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan
    pub const CYAN: &'static str = "\x1b[36m";
}

fn styled(text: &str, codes: &[&str]) -> String {
    format!("{}{text}{}", codes.concat(), Colors::RESET)
}

/// Title line of a help page
pub fn format_header(text: &str) -> String {
    styled(text, &[Colors::BOLD, Colors::CYAN])
}

/// Command name in a category listing
pub fn format_command(text: &str) -> String {
    styled(text, &[Colors::BOLD, Colors::GREEN])
}

/// Category name in the top level listing
pub fn format_category(text: &str) -> String {
    styled(text, &[Colors::BOLD, Colors::BLUE])
}

/// Descriptions, usage lines and other secondary text
pub fn format_muted(text: &str) -> String {
    styled(text, &[Colors::DIM])
}

/// Fatal errors printed by the binary
pub fn format_error(text: &str) -> String {
    styled(text, &[Colors::BOLD, Colors::RED])
}

/// Left column of a session transcript.
///
/// Padding is applied before styling so escape codes don't eat into the
/// column width.
pub fn format_label(label: &str) -> String {
    styled(&format!("{label:<LABEL_WIDTH$}"), &[Colors::BOLD, Colors::YELLOW])
}

/// Playback position and state, e.g. `1:05 playing`.
pub fn format_playback(state: &PlayerState) -> String {
    let status = if state.is_playing { "playing" } else { "paused" };
    format!("{} {status}", format_time(state.current_time))
}

/// A window's frame, e.g. `320x180 at (1580, 20)`.
///
/// # Examples
///
/// ```
/// use miniplay::{
///     cli::formatting::format_placement,
///     services::geometry::{Position, Size},
/// };
///
/// let placed = format_placement(Size::new(320, 180), Position::new(1580, 20));
/// assert_eq!(placed, "320x180 at (1580, 20)");
/// ```
pub fn format_placement(size: Size, position: Position) -> String {
    format!("{size} at {position}")
}

/// A position before and after clamping, e.g. `(1700, -5) -> (1600, 0)`.
pub fn format_clamped(requested: Position, clamped: Position) -> String {
    format!("{requested} -> {clamped}")
}

/// A fitted size with the floor it was held to, e.g. `400x300 (minimum 200x150)`.
pub fn format_fit(size: Size, minimum: Size) -> String {
    format!("{size} (minimum {minimum})")
}

/// A config value as `config get` prints it.
///
/// Strings are quoted. Arrays and tables show only their length, so
/// `config show` is the way to see a whole section.
///
/// ```
/// use miniplay::cli::formatting::format_toml_value;
///
/// let width = toml::Value::Integer(200);
/// assert_eq!(format_toml_value(&width), "200");
///
/// let url = toml::Value::String("miniplayer.html".to_string());
/// assert_eq!(format_toml_value(&url), "\"miniplayer.html\"");
/// ```
pub fn format_toml_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(arr) => format!("[{}]", arr.len()),
        Value::Table(table) => format!("{{{}}}", table.len()),
    }
}
