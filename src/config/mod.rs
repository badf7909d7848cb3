//! Configuration schema definitions and validation.
//!
//! Defines the complete configuration structure for miniplay. All sections
//! are serializable to/from TOML and every field has a default.

mod general;
mod loading;
mod miniplayer;
mod paths;
mod subtitles;
mod sync;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use miniplayer::{DEFAULT_LOAD_URL, MiniplayerConfig};
pub use paths::ConfigPaths;
pub use subtitles::SubtitleConfig;
pub use sync::{DRIFT_EPSILON, SYNC_INTERVAL, SyncConfig};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for miniplay.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Time and play-state synchronization between the two views.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Miniplayer window settings.
    #[serde(default)]
    pub miniplayer: MiniplayerConfig,

    /// Subtitle extraction helper.
    #[serde(default)]
    pub subtitles: SubtitleConfig,
}
