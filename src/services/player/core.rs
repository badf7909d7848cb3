use tracing::trace;

use crate::services::{
    common::Property,
    geometry::ratio_of,
    sync::{MediaElement, MediaSource, PlayerState, Reconciled, SyncMessage, SyncProtocol, ViewId},
    window::Relay,
};

/// State and plumbing shared by both views.
///
/// Owns the view's `PlayerState`, its sync protocol and media element, and
/// the relay to the peer. While the media is inactive (the main view with
/// the miniplayer open) the state is only mirrored and the media element
/// is left alone.
pub(crate) struct ViewCore<M> {
    view: ViewId,
    state: PlayerState,
    protocol: SyncProtocol,
    media: M,
    relay: Relay,
    published: Property<PlayerState>,
    media_active: bool,
}

impl<M: MediaElement> ViewCore<M> {
    pub fn new(state: PlayerState, protocol: SyncProtocol, media: M, relay: Relay) -> Self {
        let published = Property::new(state.clone());
        Self {
            view: relay.origin().view,
            state,
            protocol,
            media,
            relay,
            published,
            media_active: true,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn published(&self) -> Property<PlayerState> {
        self.published.clone()
    }

    pub fn protocol(&self) -> &SyncProtocol {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut SyncProtocol {
        &mut self.protocol
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    pub fn set_media_active(&mut self, active: bool) {
        self.media_active = active;
    }

    /// Send to the peer. The main view skips the send when there is no
    /// miniplayer to receive it.
    pub fn send(&self, message: SyncMessage) {
        if self.view == ViewId::Main && !self.relay.broker().miniplayer_exists() {
            trace!(message = message.name(), "No miniplayer, not sending");
            return;
        }
        self.relay.send(message);
    }

    pub fn publish(&self) {
        self.published.set(self.state.clone());
    }

    /// Pull the position from the media clock.
    pub fn refresh(&mut self) {
        if self.media_active {
            self.state.current_time = self.state.clamp_time(self.media.current_time());
        }
    }

    /// Periodic sync: report drift to the peer if this view is the authority.
    pub fn tick(&mut self) {
        self.refresh();
        if let Some(message) = self.protocol.on_tick(&self.state) {
            self.send(message);
        }
        self.publish();
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    pub fn toggle_play(&mut self) {
        self.set_playing(!self.state.is_playing);
    }

    fn set_playing(&mut self, playing: bool) {
        self.refresh();
        self.state.is_playing = playing;
        if self.media_active {
            if playing {
                self.media.play();
            } else {
                self.media.pause();
            }
        }

        let time = self.state.current_time;
        self.protocol.mark_synced(time);
        self.send(SyncMessage::PlayStateSync {
            is_playing: playing,
            time: self.media_active.then_some(time),
        });
        self.publish();
    }

    /// Jump to `time` and tell the peer immediately.
    pub fn seek(&mut self, time: f64) {
        let applied = self.state.seek(time);
        if self.media_active {
            self.media.seek(applied);
        }
        self.protocol.mark_synced(applied);
        self.send(SyncMessage::TimeSync { time: applied });
        self.publish();
    }

    pub fn skip(&mut self, delta: f64) {
        self.refresh();
        self.seek(self.state.current_time + delta);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.state.set_volume(volume);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.state.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        if self.media_active {
            self.media.set_volume(self.state.volume, self.state.is_muted);
        }
        self.publish();
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        let applied = self.state.set_playback_rate(rate);
        if applied && self.media_active {
            self.media.set_playback_rate(rate);
        }
        self.publish();
        applied
    }

    /// Load new media locally, without telling the peer.
    pub fn load(&mut self, source: MediaSource) {
        self.state.load(source);
        if self.media_active {
            self.media.load(&self.state.media_source);
        }
        self.protocol.mark_synced(0.0);
        self.publish();
    }

    /// Switch to other media and start it on the peer too.
    pub fn change_source(&mut self, source: MediaSource, is_playing: bool) {
        self.load(source.clone());
        self.state.is_playing = is_playing;
        if self.media_active && is_playing {
            self.media.play();
        }
        self.send(SyncMessage::SourceUpdate {
            source,
            time: 0.0,
            is_playing,
        });
        self.publish();
    }

    /// Record media metadata. Returns the aspect ratio, or `None` for media
    /// with no picture.
    pub fn metadata_loaded(&mut self, duration: f64, width: u32, height: u32) -> Option<f64> {
        let ratio = ratio_of(width, height);
        self.state
            .apply_metadata(duration, ratio.unwrap_or(self.state.aspect_ratio));
        self.publish();
        ratio
    }

    /// Fold in a message from the peer and drive the media to match.
    pub fn apply(&mut self, message: &SyncMessage) -> Reconciled {
        self.refresh();
        let outcome = self.protocol.reconcile(&mut self.state, message);
        if self.media_active {
            self.drive_media(&outcome);
        }
        self.publish();
        outcome
    }

    /// Make the media element match the state, after it was inactive.
    pub fn resume_media(&mut self) {
        self.media.seek(self.state.current_time);
        self.media.set_volume(self.state.volume, self.state.is_muted);
        if self.state.is_playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    fn drive_media(&mut self, outcome: &Reconciled) {
        match outcome {
            Reconciled::Unchanged
            | Reconciled::AspectRatio(_)
            | Reconciled::Geometry { .. }
            | Reconciled::Unsupported(_) => {}
            Reconciled::Seek(time) => self.media.seek(*time),
            Reconciled::PlayState { is_playing, time } => {
                if let Some(time) = time {
                    self.media.seek(*time);
                }
                if *is_playing {
                    self.media.play();
                } else {
                    self.media.pause();
                }
            }
            Reconciled::Handoff { time, is_playing } => {
                self.media.seek(*time);
                if *is_playing {
                    self.media.play();
                } else {
                    self.media.pause();
                }
            }
            Reconciled::Source {
                source,
                time,
                is_playing,
            } => {
                self.media.load(source);
                self.media.seek(*time);
                if *is_playing {
                    self.media.play();
                }
            }
        }
    }
}
