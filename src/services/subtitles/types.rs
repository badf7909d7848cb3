use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A subtitle track inside a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
    /// Position among the file's subtitle streams
    #[serde(alias = "stream_index", alias = "subtitle_index")]
    pub stream_index: u32,

    /// Language tag, if the file has one
    #[serde(default)]
    pub language: Option<String>,

    /// Track title, if the file has one
    #[serde(default)]
    pub title: Option<String>,

    /// Extracted `.srt` path, set after extraction
    #[serde(default, alias = "output_file")]
    pub output_file: Option<PathBuf>,

    /// Extracted subtitle text, set after extraction
    #[serde(default)]
    pub contents: Option<String>,
}

/// Result of a helper call, success or not.
///
/// Failures are values, not errors, so callers awaiting subtitles always
/// get something to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleResponse {
    /// Whether the helper succeeded
    pub success: bool,

    /// Tracks found or extracted
    #[serde(default)]
    pub tracks: Vec<SubtitleTrack>,

    /// Failure description when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubtitleResponse {
    /// A failed response carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tracks: Vec::new(),
            error: Some(error.into()),
        }
    }
}
