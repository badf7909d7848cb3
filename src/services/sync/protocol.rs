use std::time::Duration;

use tracing::{debug, trace, warn};

use super::{MediaSource, PlayerState, SyncMessage};
use crate::{
    config::{DRIFT_EPSILON, SYNC_INTERVAL, SyncConfig},
    services::geometry::{Position, Size},
};

/// Timing knobs for the sync protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSettings {
    /// Period of the drift check on the authoritative view
    pub interval: Duration,
    /// Drift tolerated before a time update is sent or applied
    pub drift_epsilon: f64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval: SYNC_INTERVAL,
            drift_epsilon: DRIFT_EPSILON,
        }
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            interval: config.interval(),
            drift_epsilon: config.epsilon(),
        }
    }
}

/// Whether a view currently drives playback time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Free-runs its media clock and reports drift to the peer
    Authority,
    /// Mirrors the peer's reports without sending its own
    Follower,
}

/// What an incoming message changed, so the view can drive its media element.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// Nothing changed; the update was within tolerance or not for this view
    Unchanged,
    /// Position moved
    Seek(f64),
    /// Play/pause changed, possibly with a new position
    PlayState {
        /// New play state
        is_playing: bool,
        /// Adopted position, if one was sent
        time: Option<f64>,
    },
    /// The miniplayer handed authority back
    Handoff {
        /// Final position
        time: f64,
        /// Final play state
        is_playing: bool,
    },
    /// Different media was selected
    Source {
        /// New media
        source: MediaSource,
        /// Start position
        time: f64,
        /// Whether to start playing
        is_playing: bool,
    },
    /// Media aspect ratio changed
    AspectRatio(f64),
    /// Miniplayer geometry settled
    Geometry {
        /// Window position
        position: Position,
        /// Window size
        size: Size,
    },
    /// The peer cannot play this media
    Unsupported(MediaSource),
}

/// Per-view sync decisions: when to report, and how to fold in reports.
///
/// Both views run the same protocol. Time updates in either direction are
/// gated by the drift epsilon, which is what stops the two views from
/// correcting each other in a loop; play/pause and handoffs are exact.
#[derive(Debug, Clone)]
pub struct SyncProtocol {
    role: Role,
    last_synced_time: f64,
    settings: SyncSettings,
}

impl SyncProtocol {
    /// Create a protocol in `role`, treating `synced_time` as already known
    /// to the peer.
    pub fn new(role: Role, synced_time: f64, settings: SyncSettings) -> Self {
        Self {
            role,
            last_synced_time: synced_time,
            settings,
        }
    }

    /// Current role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Switch role, e.g. when the miniplayer opens or closes.
    pub fn set_role(&mut self, role: Role) {
        if self.role != role {
            debug!(from = ?self.role, to = ?role, "Sync role changed");
            self.role = role;
        }
    }

    /// Timing settings
    pub fn settings(&self) -> SyncSettings {
        self.settings
    }

    /// Last position the peer is known to have
    pub fn last_synced_time(&self) -> f64 {
        self.last_synced_time
    }

    /// Record that the peer now has `time`, e.g. after an explicit seek was sent.
    pub fn mark_synced(&mut self, time: f64) {
        self.last_synced_time = time;
    }

    /// Whether two positions differ by more than the drift epsilon
    pub fn drifted(&self, a: f64, b: f64) -> bool {
        (a - b).abs() > self.settings.drift_epsilon
    }

    /// Periodic check. Returns a `TimeSync` to send when this view is the
    /// authority and has drifted from what the peer last heard.
    pub fn on_tick(&mut self, state: &PlayerState) -> Option<SyncMessage> {
        if self.role != Role::Authority {
            return None;
        }

        if !self.drifted(state.current_time, self.last_synced_time) {
            trace!(time = state.current_time, "Within drift tolerance, not syncing");
            return None;
        }

        self.last_synced_time = state.current_time;
        Some(SyncMessage::TimeSync {
            time: state.current_time,
        })
    }

    /// Fold an incoming message into local state.
    pub fn reconcile(&mut self, state: &mut PlayerState, message: &SyncMessage) -> Reconciled {
        match message {
            SyncMessage::TimeSync { time } => {
                if !self.drifted(state.current_time, *time) {
                    trace!(local = state.current_time, remote = time, "Ignoring small drift");
                    return Reconciled::Unchanged;
                }
                let applied = state.seek(*time);
                self.last_synced_time = applied;
                debug!(time = applied, "Adopted peer time");
                Reconciled::Seek(applied)
            }
            SyncMessage::PlayStateSync { is_playing, time } => {
                state.is_playing = *is_playing;
                let time = time.map(|time| {
                    let applied = state.seek(time);
                    self.last_synced_time = applied;
                    applied
                });
                Reconciled::PlayState {
                    is_playing: *is_playing,
                    time,
                }
            }
            SyncMessage::ClosingHandoff { time, is_playing } => {
                let applied = state.seek(*time);
                state.is_playing = *is_playing;
                self.last_synced_time = applied;
                self.set_role(Role::Authority);
                Reconciled::Handoff {
                    time: applied,
                    is_playing: *is_playing,
                }
            }
            SyncMessage::SourceUpdate {
                source,
                time,
                is_playing,
            } => {
                state.load(source.clone());
                let applied = state.seek(*time);
                state.is_playing = *is_playing;
                self.last_synced_time = applied;
                Reconciled::Source {
                    source: source.clone(),
                    time: applied,
                    is_playing: *is_playing,
                }
            }
            SyncMessage::AspectRatioUpdate { aspect_ratio } => {
                state.aspect_ratio = *aspect_ratio;
                Reconciled::AspectRatio(*aspect_ratio)
            }
            SyncMessage::GeometryUpdate { position, size } => Reconciled::Geometry {
                position: *position,
                size: *size,
            },
            SyncMessage::UnsupportedMedia { source } => Reconciled::Unsupported(source.clone()),
            SyncMessage::GeometryRequest { .. } => {
                warn!("Geometry request reached a view; it is meant for the broker");
                Reconciled::Unchanged
            }
        }
    }
}
