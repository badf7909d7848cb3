use std::fmt;

use serde::{Deserialize, Serialize};

use super::SyncError;
use crate::services::geometry::{Position, Size};

/// One of the two player surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    /// The primary application window
    Main,
    /// The always-on-top floating window
    Miniplayer,
}

impl ViewId {
    /// The view on the other end of the relay
    pub fn peer(self) -> Self {
        match self {
            ViewId::Main => ViewId::Miniplayer,
            ViewId::Miniplayer => ViewId::Main,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewId::Main => f.write_str("main"),
            ViewId::Miniplayer => f.write_str("miniplayer"),
        }
    }
}

/// Opaque reference to loaded media: a URL or an object handle.
///
/// An empty source means nothing is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSource(String);

impl MediaSource {
    /// Wrap a URL or handle
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// No media loaded
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw URL or handle
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

/// A geometry change the broker applies to the miniplayer window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GeometryRequest {
    /// Move the window; clamped to the work area
    Move {
        /// Requested left edge
        x: i32,
        /// Requested top edge
        y: i32,
    },
    /// Resize the window; width floored, height derived from the aspect ratio
    Resize {
        /// Requested width
        width: u32,
        /// Requested height, ignored once an aspect ratio is locked
        height: u32,
    },
}

/// A typed message exchanged between the views through the broker.
///
/// Each variant carries only what its receiver needs. Messages are created
/// by a view, consumed once by the broker, and delivered at most once to the
/// peer view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncMessage {
    /// Periodic or on-demand playback position report
    TimeSync {
        /// Position in seconds
        time: f64,
    },

    /// Play/pause change, optionally with the position it happened at
    PlayStateSync {
        /// Whether playback is running
        is_playing: bool,
        /// Position in seconds at the moment of the change
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<f64>,
    },

    /// Final state from a closing miniplayer; returns authority to Main
    ClosingHandoff {
        /// Position in seconds
        time: f64,
        /// Whether playback was running
        is_playing: bool,
    },

    /// Move or resize request addressed to the broker itself
    GeometryRequest {
        /// Requested change
        request: GeometryRequest,
    },

    /// Settled miniplayer geometry after a drag or resize
    GeometryUpdate {
        /// Window position
        position: Position,
        /// Window size
        size: Size,
    },

    /// Native aspect ratio of the media now playing
    AspectRatioUpdate {
        /// Width / height
        aspect_ratio: f64,
    },

    /// Switch the miniplayer to other media
    SourceUpdate {
        /// New media reference
        source: MediaSource,
        /// Start position in seconds
        time: f64,
        /// Whether to start playing
        is_playing: bool,
    },

    /// The miniplayer found it cannot show this media; Main evicts it
    UnsupportedMedia {
        /// The rejected media
        source: MediaSource,
    },
}

impl SyncMessage {
    /// Wire name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SyncMessage::TimeSync { .. } => "sync-time",
            SyncMessage::PlayStateSync { .. } => "play-state",
            SyncMessage::ClosingHandoff { .. } => "miniplayer-closing",
            SyncMessage::GeometryRequest { .. } => "geometry-request",
            SyncMessage::GeometryUpdate { .. } => "geometry-update",
            SyncMessage::AspectRatioUpdate { .. } => "update-aspect-ratio",
            SyncMessage::SourceUpdate { .. } => "update-miniplayer-source",
            SyncMessage::UnsupportedMedia { .. } => "unsupported-media",
        }
    }

    /// Whether the broker consumes this message instead of relaying it.
    pub fn is_broker_addressed(&self) -> bool {
        matches!(self, SyncMessage::GeometryRequest { .. })
    }

    /// Check payload invariants.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), SyncError> {
        let name = self.name();
        match self {
            SyncMessage::TimeSync { time } => check_time(name, "time", *time),
            SyncMessage::PlayStateSync { time, .. } => match time {
                Some(time) => check_time(name, "time", *time),
                None => Ok(()),
            },
            SyncMessage::ClosingHandoff { time, .. } | SyncMessage::SourceUpdate { time, .. } => {
                check_time(name, "time", *time)
            }
            SyncMessage::GeometryRequest {
                request: GeometryRequest::Resize { width, height },
            } if *width == 0 || *height == 0 => Err(SyncError::InvalidSize {
                width: *width,
                height: *height,
            }),
            SyncMessage::GeometryRequest { .. } | SyncMessage::UnsupportedMedia { .. } => Ok(()),
            SyncMessage::GeometryUpdate { size, .. } if size.width == 0 || size.height == 0 => {
                Err(SyncError::InvalidSize {
                    width: size.width,
                    height: size.height,
                })
            }
            SyncMessage::GeometryUpdate { .. } => Ok(()),
            SyncMessage::AspectRatioUpdate { aspect_ratio } => {
                if aspect_ratio.is_finite() && *aspect_ratio > 0.0 {
                    Ok(())
                } else {
                    Err(SyncError::InvalidAspectRatio(*aspect_ratio))
                }
            }
        }
    }

    /// Encode for a process boundary.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Malformed` if serialization fails.
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::Malformed(e.to_string()))
    }

    /// Decode and validate a message received from a process boundary.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Malformed` for undecodable input, or the
    /// validation error for a well-formed but invalid payload.
    pub fn from_json(raw: &str) -> Result<Self, SyncError> {
        let message: SyncMessage =
            serde_json::from_str(raw).map_err(|e| SyncError::Malformed(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }
}

fn check_time(message: &'static str, field: &'static str, value: f64) -> Result<(), SyncError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SyncError::InvalidTime {
            message,
            field,
            value,
        })
    }
}
