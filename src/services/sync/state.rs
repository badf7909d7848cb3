use std::time::Duration;

use super::MediaSource;
use crate::services::geometry::DEFAULT_ASPECT_RATIO;

/// Playback speeds offered by the player settings menu.
pub const PLAYBACK_RATE_PRESETS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

/// Seconds moved by the skip buttons and arrow-key shortcuts.
pub const SKIP_SECONDS: f64 = 10.0;

/// Playback state owned by a single view.
///
/// Each view keeps its own copy and is the only writer of it; the peer only
/// ever sees it through sync messages.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Playback position in seconds
    pub current_time: f64,
    /// Whether playback is running
    pub is_playing: bool,
    /// Volume in `[0, 1]`
    pub volume: f64,
    /// Whether output is muted
    pub is_muted: bool,
    /// Playback speed multiplier
    pub playback_rate: f64,
    /// Loaded media, empty when nothing is loaded
    pub media_source: MediaSource,
    /// Media length in seconds, zero until metadata loads
    pub duration: f64,
    /// Native width / height of the media
    pub aspect_ratio: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            is_playing: false,
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
            media_source: MediaSource::empty(),
            duration: 0.0,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
        }
    }
}

impl PlayerState {
    /// Whether media metadata has reported a length
    pub fn duration_known(&self) -> bool {
        self.duration > 0.0
    }

    /// Whether any media is loaded
    pub fn has_media(&self) -> bool {
        !self.media_source.is_empty()
    }

    /// Clamp a position to `[0, duration]`, or just `>= 0` while the
    /// duration is unknown.
    pub fn clamp_time(&self, time: f64) -> f64 {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if self.duration_known() {
            time.min(self.duration)
        } else {
            time
        }
    }

    /// Move to `time`, clamped. Returns the applied position.
    pub fn seek(&mut self, time: f64) -> f64 {
        self.current_time = self.clamp_time(time);
        self.current_time
    }

    /// Move by `delta` seconds, clamped. Returns the applied position.
    pub fn skip(&mut self, delta: f64) -> f64 {
        self.seek(self.current_time + delta)
    }

    /// Set volume, clamped to `[0, 1]`; zero volume counts as muted.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        self.volume = volume;
        self.is_muted = volume == 0.0;
    }

    /// Flip mute, keeping the volume level for when it is unmuted.
    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }

    /// Volume actually sent to the media element.
    pub fn effective_volume(&self) -> f64 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    /// Change playback speed. Non-positive or non-finite rates are ignored.
    ///
    /// Returns whether the rate was applied.
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if rate.is_finite() && rate > 0.0 {
            self.playback_rate = rate;
            true
        } else {
            false
        }
    }

    /// Replace the loaded media, resetting position and duration.
    pub fn load(&mut self, source: MediaSource) {
        self.media_source = source;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.aspect_ratio = DEFAULT_ASPECT_RATIO;
    }

    /// Record metadata reported by the media element.
    pub fn apply_metadata(&mut self, duration: f64, aspect_ratio: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
        self.current_time = self.clamp_time(self.current_time);
    }

    /// Position as a `Duration`, for display.
    pub fn position(&self) -> Duration {
        Duration::from_secs_f64(self.current_time.max(0.0))
    }
}

/// Format seconds as `m:ss`, the way the time display shows them.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}
