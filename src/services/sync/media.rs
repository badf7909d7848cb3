use tokio::time::Instant;

use super::MediaSource;

/// The platform media element a view drives.
///
/// Decoding and rendering live behind this trait; views only read the clock
/// and issue transport commands.
pub trait MediaElement: Send + 'static {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Jump to `time` seconds
    fn seek(&mut self, time: f64);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Whether playback is paused
    fn is_paused(&self) -> bool;

    /// Replace the loaded media and rewind
    fn load(&mut self, source: &MediaSource);

    /// Set output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64, muted: bool);

    /// Set playback speed
    fn set_playback_rate(&mut self, rate: f64);
}

/// A media element with no decoder: a clock that advances in real (tokio)
/// time while playing.
///
/// Used by the headless session and in tests, where a paused tokio clock
/// makes playback position fully deterministic.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    source: MediaSource,
    anchor_time: f64,
    anchor: Option<Instant>,
    rate: f64,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
}

impl SimulatedMedia {
    /// Create a paused element with nothing loaded.
    pub fn new() -> Self {
        Self {
            source: MediaSource::empty(),
            anchor_time: 0.0,
            anchor: None,
            rate: 1.0,
            duration: None,
            volume: 1.0,
            muted: false,
        }
    }

    /// Cap the clock at `duration` seconds, like a finite media file.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration.max(0.0));
        self
    }

    /// Currently loaded media
    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Last volume set, and whether it was muted
    pub fn volume(&self) -> (f64, bool) {
        (self.volume, self.muted)
    }

    /// Current playback rate
    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn clamp(&self, time: f64) -> f64 {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        }
    }

    fn rebase(&mut self) {
        self.anchor_time = self.current_time();
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for SimulatedMedia {
    fn current_time(&self) -> f64 {
        let elapsed = self
            .anchor
            .map(|since| since.elapsed().as_secs_f64() * self.rate)
            .unwrap_or(0.0);
        self.clamp(self.anchor_time + elapsed)
    }

    fn seek(&mut self, time: f64) {
        self.anchor_time = self.clamp(time);
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.anchor_time = self.current_time();
        self.anchor = None;
    }

    fn is_paused(&self) -> bool {
        self.anchor.is_none()
    }

    fn load(&mut self, source: &MediaSource) {
        self.source = source.clone();
        self.anchor_time = 0.0;
        self.anchor = None;
    }

    fn set_volume(&mut self, volume: f64, muted: bool) {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = muted;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rebase();
            self.rate = rate;
        }
    }
}
