use std::fmt;

use crate::services::{
    geometry::Position,
    sync::{MediaSource, SyncMessage},
};

/// Host-assigned identity of a native window.
///
/// Identities are never reused, so a message stamped with a destroyed
/// window's id can be told apart from one sent by its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    /// Wrap a raw host id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw host id
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Something the broker delivers into a view's inbox.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A message relayed from the peer view
    Message(SyncMessage),
    /// The miniplayer window is gone; sent to the main view only
    MiniplayerClosed,
    /// The miniplayer is being closed and should hand playback back;
    /// sent to the miniplayer view only
    CloseRequested,
}

/// Everything needed to open the miniplayer at the main view's position.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniplayerLaunch {
    /// Start position in seconds
    pub time: f64,
    /// Media to load
    pub source: MediaSource,
    /// Whether to start playing
    pub is_playing: bool,
    /// Preferred window position, used only when it fits on screen
    pub position: Option<Position>,
}

impl MiniplayerLaunch {
    /// Launch at the default placement.
    pub fn new(source: MediaSource, time: f64, is_playing: bool) -> Self {
        Self {
            time,
            source,
            is_playing,
            position: None,
        }
    }

    /// Prefer `position` if it is in bounds.
    pub fn at(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }
}
