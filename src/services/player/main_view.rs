use std::{ops::ControlFlow, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{Shortcut, ViewTask, core::ViewCore};
use crate::services::{
    common::Property,
    geometry::Position,
    queue::{QueueError, VideoQueue, VideoQueueEntry},
    sync::{
        MediaElement, MediaSource, PlayerState, Reconciled, Role, SyncProtocol, SyncSettings,
        ViewId,
    },
    window::{MiniplayerLaunch, Relay, ViewEvent},
};

/// Commands accepted by the main view.
#[derive(Debug, Clone, PartialEq)]
pub enum MainCommand {
    /// Queue an entry and start playing it
    Load(VideoQueueEntry),
    /// The media element reported metadata for the current media
    MetadataLoaded {
        /// Length in seconds
        duration: f64,
        /// Intrinsic width; zero for media with no picture
        width: u32,
        /// Intrinsic height; zero for media with no picture
        height: u32,
    },
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Flip play/pause
    TogglePlay,
    /// Jump to a position in seconds
    Seek(f64),
    /// Move by a number of seconds
    Skip(f64),
    /// Set volume in `[0, 1]`
    SetVolume(f64),
    /// Flip mute
    ToggleMute,
    /// Set playback speed
    SetPlaybackRate(f64),
    /// Open or close the miniplayer
    ToggleMiniplayer,
    /// A key was pressed in the main window
    Key(String),
    /// Append to the queue without playing
    Enqueue(VideoQueueEntry),
    /// Remove a queue entry
    Remove(usize),
    /// Move a queue entry
    Reorder {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
    /// Play a queue entry
    Select(usize),
    /// Play the next queue entry
    Next,
    /// Play the previous queue entry
    Previous,
    /// Close the main view
    Close,
}

/// The primary player window.
///
/// Authority over playback while no miniplayer exists. Opening the
/// miniplayer pauses local media and hands playback over; from then on this
/// view only mirrors what the miniplayer reports, until the miniplayer
/// closes and its final state is handed back.
pub struct MainView<M> {
    core: ViewCore<M>,
    queue: VideoQueue,
    queue_published: Property<VideoQueue>,
    suspended: bool,
    last_miniplayer_position: Option<Position>,
}

impl<M: MediaElement> MainView<M> {
    /// Create the main view. `relay` must come from connecting as
    /// [`ViewId::Main`].
    pub fn new(relay: Relay, media: M, settings: SyncSettings) -> Self {
        debug_assert_eq!(relay.origin().view, ViewId::Main);
        let protocol = SyncProtocol::new(Role::Authority, 0.0, settings);

        Self {
            core: ViewCore::new(PlayerState::default(), protocol, media, relay),
            queue: VideoQueue::new(),
            queue_published: Property::new(VideoQueue::new()),
            suspended: false,
            last_miniplayer_position: None,
        }
    }

    /// The queue as last published.
    pub fn queue(&self) -> Property<VideoQueue> {
        self.queue_published.clone()
    }

    fn publish_queue(&self) {
        self.queue_published.set(self.queue.clone());
    }

    fn miniplayer_exists(&self) -> bool {
        self.core.relay().broker().miniplayer_exists()
    }

    #[instrument(skip(self))]
    async fn toggle_miniplayer(&mut self) {
        let broker = self.core.relay().broker().clone();

        if broker.miniplayer_exists() {
            info!("Closing miniplayer");
            let state = self.core.state();
            let launch =
                MiniplayerLaunch::new(state.media_source.clone(), state.current_time, state.is_playing);
            broker.toggle_miniplayer(launch).await;
            return;
        }

        self.core.refresh();
        let state = self.core.state();
        let launch =
            MiniplayerLaunch::new(state.media_source.clone(), state.current_time, state.is_playing)
                .at(self.last_miniplayer_position);

        self.suspend();
        if broker.toggle_miniplayer(launch).await {
            info!("Playback handed to miniplayer");
        } else {
            warn!("Miniplayer failed to open, keeping playback here");
            self.resume();
        }
    }

    fn suspend(&mut self) {
        self.core.media_mut().pause();
        self.core.set_media_active(false);
        self.core.protocol_mut().set_role(Role::Follower);
        self.suspended = true;
    }

    /// Take playback back from the miniplayer. Safe to call more than once.
    fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;

        self.core.set_media_active(true);
        let time = self.core.state().current_time;
        self.core.protocol_mut().set_role(Role::Authority);
        self.core.protocol_mut().mark_synced(time);
        self.core.resume_media();
        self.core.publish();

        info!(time, is_playing = self.core.state().is_playing, "Main view resumed playback");
    }

    fn handle_shortcut(&mut self, key: &str) {
        if self.miniplayer_exists() {
            debug!(key, "Miniplayer owns shortcuts");
            return;
        }
        let Some(shortcut) = Shortcut::from_key(key) else {
            return;
        };

        match shortcut {
            Shortcut::TogglePlay => self.core.toggle_play(),
            Shortcut::SkipBackward | Shortcut::SkipForward => {
                if let Some(delta) = shortcut.skip_delta() {
                    self.core.skip(delta);
                }
            }
            Shortcut::ToggleMute => self.core.toggle_mute(),
            Shortcut::VolumeUp | Shortcut::VolumeDown => {
                if let Some(delta) = shortcut.volume_delta() {
                    let volume = self.core.state().volume + delta;
                    self.core.set_volume(volume);
                }
            }
            Shortcut::Close => {}
        }
    }

    fn play_selected(&mut self, selected: Result<Option<VideoQueueEntry>, QueueError>) {
        match selected {
            Ok(Some(entry)) => {
                info!(name = %entry.name, "Playing queue entry");
                self.core.change_source(entry.source, true);
            }
            Ok(None) => debug!("No queue entry in that direction"),
            Err(e) => warn!(error = %e, "Queue selection failed"),
        }
        self.publish_queue();
    }

    fn metadata_loaded(&mut self, duration: f64, width: u32, height: u32) {
        if self.core.metadata_loaded(duration, width, height).is_none() {
            let source = self.core.state().media_source.clone();
            self.reject_media(source);
        }
    }

    /// Evict media that has no picture, stop it in both views and tell the
    /// user.
    fn reject_media(&mut self, source: MediaSource) {
        let name = self
            .queue
            .entries()
            .iter()
            .find(|entry| entry.source == source)
            .map_or_else(|| source.to_string(), |entry| entry.name.clone());

        warn!(%source, "Media has no video dimensions, evicting");
        self.queue.evict(&source);
        self.publish_queue();
        self.core.pause();
        self.core.change_source(MediaSource::empty(), false);
        self.core.relay().broker().show_error(
            "Unsupported media",
            format!("{name} cannot be played: the file has no video dimensions."),
        );
    }

    fn handle_command(&mut self, command: MainCommand) {
        match command {
            MainCommand::Load(entry) => {
                let index = self.queue.add(entry);
                let selected = self.queue.select(index).map(|entry| Some(entry.clone()));
                self.play_selected(selected);
            }
            MainCommand::Enqueue(entry) => {
                self.queue.add(entry);
                self.publish_queue();
            }
            MainCommand::MetadataLoaded {
                duration,
                width,
                height,
            } => self.metadata_loaded(duration, width, height),
            MainCommand::Play => self.core.play(),
            MainCommand::Pause => self.core.pause(),
            MainCommand::TogglePlay => self.core.toggle_play(),
            MainCommand::Seek(time) => self.core.seek(time),
            MainCommand::Skip(delta) => self.core.skip(delta),
            MainCommand::SetVolume(volume) => self.core.set_volume(volume),
            MainCommand::ToggleMute => self.core.toggle_mute(),
            MainCommand::SetPlaybackRate(rate) => {
                if !self.core.set_playback_rate(rate) {
                    warn!(rate, "Ignoring invalid playback rate");
                }
            }
            MainCommand::Key(key) => self.handle_shortcut(&key),
            MainCommand::Remove(index) => {
                if let Err(e) = self.queue.remove(index) {
                    warn!(error = %e, "Queue removal failed");
                }
                self.publish_queue();
            }
            MainCommand::Reorder { from, to } => {
                if let Err(e) = self.queue.reorder(from, to) {
                    warn!(error = %e, "Queue reorder failed");
                }
                self.publish_queue();
            }
            MainCommand::Select(index) => {
                let selected = self.queue.select(index).map(|entry| Some(entry.clone()));
                self.play_selected(selected);
            }
            MainCommand::Next => {
                let selected = self.queue.next().map(|entry| entry.cloned());
                self.play_selected(selected);
            }
            MainCommand::Previous => {
                let selected = self.queue.previous().map(|entry| entry.cloned());
                self.play_selected(selected);
            }
            MainCommand::ToggleMiniplayer | MainCommand::Close => {}
        }
    }
}

#[async_trait]
impl<M: MediaElement> ViewTask for MainView<M> {
    type Command = MainCommand;

    fn name(&self) -> &'static str {
        "main"
    }

    fn interval(&self) -> Duration {
        self.core.protocol().settings().interval
    }

    fn state(&self) -> Property<PlayerState> {
        self.core.published()
    }

    async fn on_tick(&mut self) {
        self.core.tick();
    }

    async fn on_event(&mut self, event: ViewEvent) -> ControlFlow<()> {
        match event {
            ViewEvent::Message(message) => match self.core.apply(&message) {
                Reconciled::Handoff { time, is_playing } => {
                    debug!(time, is_playing, "Miniplayer handed playback back");
                    if self.miniplayer_exists() {
                        self.core.protocol_mut().set_role(Role::Follower);
                    } else {
                        self.resume();
                    }
                }
                Reconciled::Geometry { position, size } => {
                    debug!(%position, %size, "Remembering miniplayer geometry");
                    self.last_miniplayer_position = Some(position);
                }
                Reconciled::Unsupported(source) => {
                    if source == self.core.state().media_source {
                        self.reject_media(source);
                    } else {
                        debug!(%source, "Ignoring report for media no longer playing");
                    }
                }
                _ => {}
            },
            ViewEvent::MiniplayerClosed => self.resume(),
            ViewEvent::CloseRequested => {}
        }
        ControlFlow::Continue(())
    }

    async fn on_command(&mut self, command: MainCommand) -> ControlFlow<()> {
        match command {
            MainCommand::ToggleMiniplayer => self.toggle_miniplayer().await,
            MainCommand::Close => return ControlFlow::Break(()),
            command => self.handle_command(command),
        }
        ControlFlow::Continue(())
    }

    async fn shutdown(&mut self) {
        self.core.media_mut().pause();
        info!("Main view closed");
    }
}
