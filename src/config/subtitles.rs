use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// External subtitle extraction helper settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Interpreter used to run the helper script.
    pub python: String,

    /// Path to the helper script.
    pub script: PathBuf,

    /// Directory extracted `.srt` files are written to. Defaults to
    /// `~/.miniplay/subtitles` when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            script: PathBuf::from("python/subtitle_extractor.py"),
            output_dir: None,
        }
    }
}
