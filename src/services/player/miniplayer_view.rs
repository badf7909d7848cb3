use std::{ops::ControlFlow, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{Shortcut, ViewTask, core::ViewCore};
use crate::services::{
    common::Property,
    geometry::{
        AspectLock, DragSession, MIN_WIDTH, PointerPosition, PointerTarget, ResizeSession,
    },
    sync::{
        GeometryRequest, MediaElement, PlayerState, Reconciled, Role, SyncMessage, SyncProtocol,
        SyncSettings, ViewId,
    },
    window::{Relay, StartupParams, ViewEvent, WindowId},
};

/// Commands accepted by the miniplayer view.
#[derive(Debug, Clone, PartialEq)]
pub enum MiniplayerCommand {
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
    /// The media element reported metadata
    MetadataLoaded {
        /// Length in seconds
        duration: f64,
        /// Intrinsic width
        width: u32,
        /// Intrinsic height
        height: u32,
    },
    /// Pointer pressed on the window
    PointerDown {
        /// What was under the pointer
        target: PointerTarget,
        /// Screen position
        pointer: PointerPosition,
    },
    /// Pointer moved while pressed
    PointerMove(PointerPosition),
    /// Pointer released
    PointerUp,
    /// A key was pressed in the miniplayer
    Key(String),
    /// Close the miniplayer, handing playback back
    Close,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Drag(DragSession),
    Resize(ResizeSession),
}

/// Sends the closing handoff exactly once, even if the view is dropped
/// without shutting down cleanly.
struct HandoffGuard {
    relay: Relay,
    published: Property<PlayerState>,
    window: WindowId,
    sent: bool,
}

impl HandoffGuard {
    fn fire(&mut self) {
        if self.sent {
            return;
        }
        self.sent = true;

        let state = self.published.get();
        info!(
            time = state.current_time,
            is_playing = state.is_playing,
            "Handing playback back to main view"
        );
        self.relay.send(SyncMessage::ClosingHandoff {
            time: state.current_time,
            is_playing: state.is_playing,
        });
        self.relay.broker().close_miniplayer(self.window);
    }
}

impl Drop for HandoffGuard {
    fn drop(&mut self) {
        self.fire();
    }
}

/// The floating miniplayer window.
///
/// Boots from the parameters in its load URL and is the playback authority
/// for as long as it lives. Dragging and resizing are computed here and
/// requested from the broker, since the window has no native frame.
pub struct MiniplayerView<M> {
    core: ViewCore<M>,
    gesture: Option<Gesture>,
    handoff: HandoffGuard,
    min_width: u32,
}

impl<M: MediaElement> MiniplayerView<M> {
    /// Create the miniplayer view hosted in `window`, starting from `params`.
    ///
    /// `relay` must come from connecting as [`ViewId::Miniplayer`].
    pub fn new(
        params: StartupParams,
        window: WindowId,
        relay: Relay,
        mut media: M,
        settings: SyncSettings,
    ) -> Self {
        debug_assert_eq!(relay.origin().view, ViewId::Miniplayer);

        let mut state = PlayerState::default();
        state.load(params.video_src);
        state.current_time = params.time.max(0.0);
        state.is_playing = params.is_playing;

        media.load(&state.media_source);
        media.seek(state.current_time);
        if state.is_playing {
            media.play();
        }

        debug!(
            %window,
            source = %state.media_source,
            time = state.current_time,
            is_playing = state.is_playing,
            "Miniplayer bootstrapped"
        );

        let protocol = SyncProtocol::new(Role::Authority, state.current_time, settings);
        let core = ViewCore::new(state, protocol, media, relay.clone());
        let handoff = HandoffGuard {
            relay,
            published: core.published(),
            window,
            sent: false,
        };

        Self {
            core,
            gesture: None,
            handoff,
            min_width: MIN_WIDTH,
        }
    }

    /// Floor resizes at `min_width` instead of the default. Must match the
    /// broker's configured minimum.
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    async fn pointer_down(&mut self, target: PointerTarget, pointer: PointerPosition) {
        let broker = self.core.relay().broker().clone();

        self.gesture = match target {
            PointerTarget::Control => None,
            PointerTarget::Surface => {
                let start = broker.window_position().await;
                Some(Gesture::Drag(DragSession::begin(start, pointer)))
            }
            PointerTarget::ResizeHandle => {
                let position = broker.window_position().await;
                let size = broker.window_size().await;
                let area = broker.screen_work_area().await;
                let lock = AspectLock::new(self.core.state().aspect_ratio, self.min_width);
                Some(Gesture::Resize(ResizeSession::begin(
                    size, position, pointer, area, lock,
                )))
            }
        };
    }

    fn pointer_move(&self, pointer: PointerPosition) {
        let request = match self.gesture {
            None => return,
            Some(Gesture::Drag(drag)) => {
                let position = drag.update(pointer);
                GeometryRequest::Move {
                    x: position.x,
                    y: position.y,
                }
            }
            Some(Gesture::Resize(resize)) => {
                let size = resize.update(pointer);
                GeometryRequest::Resize {
                    width: size.width,
                    height: size.height,
                }
            }
        };
        self.core.relay().send(SyncMessage::GeometryRequest { request });
    }

    async fn pointer_up(&mut self) {
        if self.gesture.take().is_none() {
            return;
        }

        let broker = self.core.relay().broker().clone();
        let position = broker.window_position().await;
        let size = broker.window_size().await;
        self.core
            .relay()
            .send(SyncMessage::GeometryUpdate { position, size });
    }

    fn metadata_loaded(&mut self, duration: f64, width: u32, height: u32) {
        match self.core.metadata_loaded(duration, width, height) {
            Some(aspect_ratio) => self
                .core
                .relay()
                .send(SyncMessage::AspectRatioUpdate { aspect_ratio }),
            None => {
                let source = self.core.state().media_source.clone();
                warn!(%source, width, height, "Media has no video dimensions, reporting to main view");
                self.core.pause();
                self.core.relay().send(SyncMessage::UnsupportedMedia { source });
            }
        }
    }

    /// Returns `Break` for the close shortcut.
    fn handle_shortcut(&mut self, key: &str) -> ControlFlow<()> {
        let Some(shortcut) = Shortcut::from_key(key) else {
            return ControlFlow::Continue(());
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
            Shortcut::Close => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

#[async_trait]
impl<M: MediaElement> ViewTask for MiniplayerView<M> {
    type Command = MiniplayerCommand;

    fn name(&self) -> &'static str {
        "miniplayer"
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
            ViewEvent::Message(message) => {
                if let Reconciled::Source { source, .. } = self.core.apply(&message) {
                    debug!(%source, "Main view switched media");
                }
            }
            ViewEvent::CloseRequested => {
                debug!("Broker is closing the miniplayer");
                return ControlFlow::Break(());
            }
            ViewEvent::MiniplayerClosed => {}
        }
        ControlFlow::Continue(())
    }

    async fn on_command(&mut self, command: MiniplayerCommand) -> ControlFlow<()> {
        match command {
            MiniplayerCommand::Play => self.core.play(),
            MiniplayerCommand::Pause => self.core.pause(),
            MiniplayerCommand::TogglePlay => self.core.toggle_play(),
            MiniplayerCommand::Seek(time) => self.core.seek(time),
            MiniplayerCommand::Skip(delta) => self.core.skip(delta),
            MiniplayerCommand::MetadataLoaded {
                duration,
                width,
                height,
            } => self.metadata_loaded(duration, width, height),
            MiniplayerCommand::PointerDown { target, pointer } => {
                self.pointer_down(target, pointer).await;
            }
            MiniplayerCommand::PointerMove(pointer) => self.pointer_move(pointer),
            MiniplayerCommand::PointerUp => self.pointer_up().await,
            MiniplayerCommand::Key(key) => return self.handle_shortcut(&key),
            MiniplayerCommand::Close => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    async fn shutdown(&mut self) {
        self.core.refresh();
        self.core.publish();
        self.core.media_mut().pause();
        self.handoff.fire();
    }
}
