use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::oneshot,
    time::{self, Instant},
};
use tracing::{debug, error, info, instrument, warn};

use super::types::{BrokerRequest, Origin, RequestReceiver, ViewOutbox};
use crate::{
    config::MiniplayerConfig,
    services::{
        common::Property,
        geometry::{
            AspectLock, DEFAULT_ASPECT_RATIO, DEFAULT_MINIPLAYER_SIZE, Position, Size, WorkArea,
            clamp_position, initial_placement,
        },
        sync::{GeometryRequest, SyncMessage, ViewId},
        window::{
            MiniplayerLaunch, MiniplayerOptions, StartupParams, ViewEvent, WindowError,
            WindowHost, WindowId,
        },
    },
};

/// Work area assumed when the host cannot report one.
pub(super) const FALLBACK_WORK_AREA: WorkArea = Size::new(1920, 1080);

/// Position reported while no miniplayer exists.
pub(super) const ABSENT_POSITION: Position = Position::new(0, 0);

/// Size reported while no miniplayer exists.
pub(super) const ABSENT_SIZE: Size = DEFAULT_MINIPLAYER_SIZE;

/// How long a closing miniplayer gets to hand playback back.
pub(super) const HANDOFF_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct ViewSlot {
    window: Option<WindowId>,
    outbox: Option<ViewOutbox>,
}

/// A close waiting for the miniplayer's handoff.
#[derive(Debug)]
struct PendingClose {
    window: WindowId,
    /// The host already removed the window; nothing left to destroy
    host_closed: bool,
    deadline: Instant,
    replies: Vec<oneshot::Sender<bool>>,
}

/// The broker task's state. Only this task touches the window slots.
pub(super) struct Broker {
    host: Arc<dyn WindowHost>,
    config: MiniplayerConfig,
    slots: HashMap<ViewId, ViewSlot>,
    lock: AspectLock,
    exists: Property<bool>,
    closing: Option<PendingClose>,
}

impl Broker {
    pub(super) fn new(
        host: Arc<dyn WindowHost>,
        config: MiniplayerConfig,
        exists: Property<bool>,
    ) -> Self {
        let lock = AspectLock::new(DEFAULT_ASPECT_RATIO, config.min_width);
        Self {
            host,
            config,
            slots: HashMap::new(),
            lock,
            exists,
            closing: None,
        }
    }

    /// Serve requests until shutdown or until every handle is dropped.
    pub(super) async fn run(mut self, mut requests: RequestReceiver) {
        debug!("Window broker started");

        loop {
            let request = match self.closing.as_ref().map(|pending| pending.deadline) {
                Some(deadline) => tokio::select! {
                    request = requests.recv() => request,
                    () = time::sleep_until(deadline) => {
                        self.handoff_timed_out().await;
                        continue;
                    }
                },
                None => requests.recv().await,
            };

            match request {
                None | Some(BrokerRequest::Shutdown) => break,
                Some(request) => self.handle(request).await,
            }
        }

        if let Some(window) = self.miniplayer_window() {
            self.finish_close(window).await;
        }
        debug!("Window broker stopped");
    }

    async fn handle(&mut self, request: BrokerRequest) {
        match request {
            BrokerRequest::Connect { origin, outbox } => self.connect(origin, outbox),
            BrokerRequest::Toggle { launch, reply } => self.toggle(launch, reply).await,
            BrokerRequest::CloseMiniplayer { window } => {
                if self.miniplayer_window() == Some(window) {
                    self.finish_close(window).await;
                } else {
                    debug!(%window, "Close requested for a window that is not the miniplayer");
                }
            }
            BrokerRequest::Relay { message, origin } => self.relay(message, origin).await,
            BrokerRequest::SetPosition { position } => self.set_position(position).await,
            BrokerRequest::Resize { size } => self.resize(size).await,
            BrokerRequest::UpdateAspectRatio { ratio } => self.update_aspect_ratio(ratio).await,
            BrokerRequest::QueryPosition { reply } => {
                let _ = reply.send(self.window_position().await);
            }
            BrokerRequest::QuerySize { reply } => {
                let _ = reply.send(self.window_size().await);
            }
            BrokerRequest::QueryWorkArea { reply } => {
                let _ = reply.send(self.work_area().await);
            }
            BrokerRequest::WindowClosed { window } => {
                if self.miniplayer_window() == Some(window) {
                    info!(%window, "Miniplayer closed by host");
                    self.begin_close(window, true, None).await;
                }
            }
            BrokerRequest::ShowError { title, message } => {
                if let Err(e) = self.host.show_error(&title, &message).await {
                    error!(error = %e, %title, "Failed to show error dialog");
                }
            }
            BrokerRequest::Shutdown => {}
        }
    }

    fn miniplayer_window(&self) -> Option<WindowId> {
        self.slots
            .get(&ViewId::Miniplayer)
            .and_then(|slot| slot.window)
    }

    fn connect(&mut self, origin: Origin, outbox: ViewOutbox) {
        match origin.view {
            ViewId::Main => {
                if self.slots.contains_key(&ViewId::Main) {
                    warn!("Main view reconnected, replacing previous link");
                }
                self.slots.insert(
                    ViewId::Main,
                    ViewSlot {
                        window: None,
                        outbox: Some(outbox),
                    },
                );
                debug!("Main view connected");
            }
            ViewId::Miniplayer => match self.slots.get_mut(&ViewId::Miniplayer) {
                Some(slot) if origin.window.is_some() && slot.window == origin.window => {
                    slot.outbox = Some(outbox);
                    debug!(window = ?origin.window, "Miniplayer view connected");
                }
                _ => {
                    warn!(window = ?origin.window, "Rejecting miniplayer view for a window that no longer exists");
                }
            },
        }
    }

    async fn toggle(&mut self, launch: MiniplayerLaunch, reply: oneshot::Sender<bool>) {
        if let Some(window) = self.miniplayer_window() {
            if self.closing.is_none() {
                self.begin_close(window, false, Some(reply)).await;
                return;
            }
            // The pending close counts as the previous toggle.
            debug!(%window, "Toggled while closing, finishing the close first");
            self.finish_close(window).await;
        }

        let exists = match self.create_miniplayer(&launch).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to create miniplayer");
                false
            }
        };
        let _ = reply.send(exists);
    }

    #[instrument(skip(self, launch), fields(time = launch.time, is_playing = launch.is_playing))]
    async fn create_miniplayer(&mut self, launch: &MiniplayerLaunch) -> Result<WindowId, WindowError> {
        let area = self.work_area().await;

        self.lock = AspectLock::new(DEFAULT_ASPECT_RATIO, self.config.min_width);
        let size = self.lock.fit(self.config.initial_size());
        let position = initial_placement(launch.position, size, area, self.config.edge_margin);
        let url = StartupParams::from(launch).to_url(&self.config.load_url)?;

        let options = MiniplayerOptions::builder(url)
            .size(size)
            .position(position)
            .min_size(self.lock.min_size())
            .aspect_ratio(self.lock.ratio())
            .chrome(&self.config)
            .build();

        let window = self.host.create_window(&options).await?;
        self.slots.insert(
            ViewId::Miniplayer,
            ViewSlot {
                window: Some(window),
                outbox: None,
            },
        );
        self.exists.set(true);

        info!(%window, %position, %size, "Miniplayer created");
        Ok(window)
    }

    /// Ask the miniplayer view to hand playback back; the window stays
    /// until it does or the grace period runs out. With no view attached
    /// there is nothing to wait for.
    async fn begin_close(
        &mut self,
        window: WindowId,
        host_closed: bool,
        reply: Option<oneshot::Sender<bool>>,
    ) {
        if let Some(pending) = &mut self.closing {
            pending.host_closed |= host_closed;
            pending.replies.extend(reply);
            return;
        }

        self.closing = Some(PendingClose {
            window,
            host_closed,
            deadline: Instant::now() + HANDOFF_GRACE,
            replies: reply.into_iter().collect(),
        });

        if self.deliver(ViewId::Miniplayer, ViewEvent::CloseRequested) {
            debug!(%window, "Waiting for miniplayer handoff");
        } else {
            self.finish_close(window).await;
        }
    }

    async fn handoff_timed_out(&mut self) {
        if let Some(window) = self.closing.as_ref().map(|pending| pending.window) {
            warn!(%window, "Miniplayer did not hand playback back in time");
            self.finish_close(window).await;
        }
    }

    /// Tear the miniplayer down and tell Main. Runs after the handoff, so
    /// Main sees the final state before it takes over.
    #[instrument(skip(self))]
    async fn finish_close(&mut self, window: WindowId) {
        let pending = self.closing.take();
        let host_closed = pending.as_ref().is_some_and(|pending| pending.host_closed);

        if !host_closed {
            if let Err(e) = self.host.destroy_window(window).await {
                warn!(error = %e, "Host failed to destroy miniplayer, treating it as gone");
            }
        }

        self.slots.remove(&ViewId::Miniplayer);
        self.exists.set(false);
        self.deliver(ViewId::Main, ViewEvent::MiniplayerClosed);
        info!("Miniplayer closed");

        for reply in pending.into_iter().flat_map(|pending| pending.replies) {
            let _ = reply.send(false);
        }
    }

    async fn relay(&mut self, message: SyncMessage, origin: Origin) {
        if let Err(e) = message.validate() {
            warn!(error = %e, from = %origin.view, "Dropping invalid message");
            return;
        }

        if origin.view == ViewId::Miniplayer && origin.window != self.miniplayer_window() {
            debug!(message = message.name(), sender = ?origin.window, "Dropping message from a miniplayer that is gone");
            return;
        }

        match &message {
            SyncMessage::GeometryRequest { request } => {
                match *request {
                    GeometryRequest::Move { x, y } => self.set_position(Position::new(x, y)).await,
                    GeometryRequest::Resize { width, height } => {
                        self.resize(Size::new(width, height)).await;
                    }
                }
                return;
            }
            SyncMessage::AspectRatioUpdate { aspect_ratio } => {
                self.update_aspect_ratio(*aspect_ratio).await;
            }
            _ => {}
        }

        let to = origin.view.peer();
        debug!(message = message.name(), from = %origin.view, %to, "Relaying");
        self.deliver(to, ViewEvent::Message(message));
    }

    /// Returns whether the event reached the view's inbox.
    fn deliver(&mut self, to: ViewId, event: ViewEvent) -> bool {
        let Some(slot) = self.slots.get_mut(&to) else {
            debug!(%to, "Peer view absent, dropping");
            return false;
        };
        let Some(outbox) = &slot.outbox else {
            debug!(%to, "Peer view not connected yet, dropping");
            return false;
        };
        if outbox.send(event).is_err() {
            debug!(%to, "Peer view has gone away, dropping");
            slot.outbox = None;
            return false;
        }
        true
    }

    async fn set_position(&mut self, requested: Position) {
        let Some(window) = self.miniplayer_window() else {
            debug!("No miniplayer to move");
            return;
        };

        let size = self.host.size(window).await.unwrap_or(ABSENT_SIZE);
        let area = self.work_area().await;
        let position = clamp_position(requested, size, area);

        if let Err(e) = self.host.set_position(window, position).await {
            warn!(error = %e, "Failed to move miniplayer");
        }
    }

    async fn resize(&mut self, requested: Size) {
        let Some(window) = self.miniplayer_window() else {
            debug!("No miniplayer to resize");
            return;
        };

        let size = self.lock.fit(requested);
        if let Err(e) = self.host.set_size(window, size).await {
            warn!(error = %e, "Failed to resize miniplayer");
            return;
        }

        self.keep_on_screen(window, size).await;
    }

    async fn keep_on_screen(&self, window: WindowId, size: Size) {
        let Ok(position) = self.host.position(window).await else {
            return;
        };
        let area = self.work_area().await;
        let clamped = clamp_position(position, size, area);

        if clamped != position {
            debug!(from = %position, to = %clamped, "Pulling resized miniplayer back on screen");
            if let Err(e) = self.host.set_position(window, clamped).await {
                warn!(error = %e, "Failed to reposition miniplayer");
            }
        }
    }

    async fn update_aspect_ratio(&mut self, ratio: f64) {
        if !(ratio.is_finite() && ratio > 0.0) {
            warn!(ratio, "Ignoring invalid aspect ratio");
            return;
        }
        let Some(window) = self.miniplayer_window() else {
            debug!(ratio, "No miniplayer to reshape");
            return;
        };

        self.lock = self.lock.with_ratio(ratio);
        debug!(ratio, min = %self.lock.min_size(), "Aspect ratio locked");

        if let Err(e) = self.host.set_min_size(window, self.lock.min_size()).await {
            warn!(error = %e, "Failed to set miniplayer minimum size");
        }

        let current = self.host.size(window).await.unwrap_or(ABSENT_SIZE);
        self.resize(current).await;
    }

    async fn window_position(&self) -> Position {
        let Some(window) = self.miniplayer_window() else {
            return ABSENT_POSITION;
        };
        self.host.position(window).await.unwrap_or_else(|e| {
            debug!(error = %e, "Position query failed");
            ABSENT_POSITION
        })
    }

    async fn window_size(&self) -> Size {
        let Some(window) = self.miniplayer_window() else {
            return ABSENT_SIZE;
        };
        self.host.size(window).await.unwrap_or_else(|e| {
            debug!(error = %e, "Size query failed");
            ABSENT_SIZE
        })
    }

    async fn work_area(&self) -> WorkArea {
        self.host.work_area().await.unwrap_or_else(|e| {
            warn!(error = %e, "Work area unavailable, assuming {FALLBACK_WORK_AREA}");
            FALLBACK_WORK_AREA
        })
    }
}
