use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Period between drift checks on the authoritative view.
pub const SYNC_INTERVAL: Duration = Duration::from_millis(1000);

/// Time difference, in seconds, below which views are considered in sync.
///
/// Incoming time updates closer than this are ignored and outgoing ones are
/// not sent, which keeps playback from stuttering and the relay from flooding.
pub const DRIFT_EPSILON: f64 = 0.5;

/// Main-window/miniplayer synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Milliseconds between periodic time reports from the authoritative view.
    pub interval_ms: u64,

    /// Seconds of drift tolerated before a time update is sent or applied.
    pub drift_epsilon: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_ms: SYNC_INTERVAL.as_millis() as u64,
            drift_epsilon: DRIFT_EPSILON,
        }
    }
}

impl SyncConfig {
    /// Sync period as a `Duration`, never shorter than 10ms.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(10))
    }

    /// Drift tolerance, falling back to the default when misconfigured.
    pub fn epsilon(&self) -> f64 {
        if self.drift_epsilon.is_finite() && self.drift_epsilon >= 0.0 {
            self.drift_epsilon
        } else {
            DRIFT_EPSILON
        }
    }
}
