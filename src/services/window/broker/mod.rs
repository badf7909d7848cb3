mod actor;
mod types;

use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

use actor::{ABSENT_POSITION, ABSENT_SIZE, Broker, FALLBACK_WORK_AREA};
use types::{BrokerRequest, RequestSender};

pub use types::Origin;

use super::{MiniplayerLaunch, ViewEvent, WindowHost, WindowId};
use crate::{
    config::MiniplayerConfig,
    services::{
        common::Property,
        geometry::{Position, Size, WorkArea},
        sync::{SyncMessage, ViewId},
    },
};

/// Handle to the window broker task.
///
/// The broker owns the single miniplayer window slot and relays messages
/// between the two views. It runs as its own task; every method here is a
/// message to it, so requests from one caller are processed in order and
/// concurrent toggles can never produce two windows. Failures inside the
/// host are logged and turned into defaults, never returned to callers.
#[derive(Clone, Debug)]
pub struct BrokerHandle {
    requests: RequestSender,
    exists: Property<bool>,
}

impl BrokerHandle {
    /// Start a broker over `host`.
    #[instrument(skip(host, config), fields(load_url = %config.load_url))]
    pub fn spawn(host: Arc<dyn WindowHost>, config: MiniplayerConfig) -> Self {
        info!("Starting window broker");

        let (requests, requests_rx) = mpsc::unbounded_channel();
        let exists = Property::new(false);
        let broker = Broker::new(host, config, exists.clone());
        tokio::spawn(broker.run(requests_rx));

        Self { requests, exists }
    }

    /// Open the miniplayer if absent, close it if present.
    ///
    /// Returns whether a miniplayer exists afterwards. A failed creation
    /// leaves it absent. Closing first asks the miniplayer view for its
    /// handoff and resolves once the window is gone, at most
    /// 500ms later if the view never answers.
    pub async fn toggle_miniplayer(&self, launch: MiniplayerLaunch) -> bool {
        let (reply, rx) = oneshot::channel();
        self.send(BrokerRequest::Toggle { launch, reply });
        rx.await.unwrap_or(false)
    }

    /// Close the miniplayer hosted in `window`, if it is still the current one.
    ///
    /// Unlike a toggle this never opens a window.
    pub fn close_miniplayer(&self, window: WindowId) {
        self.send(BrokerRequest::CloseMiniplayer { window });
    }

    /// Forward `message` to the view opposite `origin`. Never echoed back.
    pub fn relay(&self, message: SyncMessage, origin: Origin) {
        self.send(BrokerRequest::Relay { message, origin });
    }

    /// Move the miniplayer, clamped to the work area.
    pub fn set_miniplayer_position(&self, x: i32, y: i32) {
        self.send(BrokerRequest::SetPosition {
            position: Position::new(x, y),
        });
    }

    /// Resize the miniplayer. Width is floored; height follows the locked
    /// aspect ratio and `height` is ignored.
    pub fn resize_miniplayer(&self, width: u32, height: u32) {
        self.send(BrokerRequest::Resize {
            size: Size::new(width, height),
        });
    }

    /// Lock the miniplayer to `ratio` and raise its minimum height to match.
    pub fn update_aspect_ratio(&self, ratio: f64) {
        self.send(BrokerRequest::UpdateAspectRatio { ratio });
    }

    /// Miniplayer position, or `(0, 0)` when there is none.
    pub async fn window_position(&self) -> Position {
        let (reply, rx) = oneshot::channel();
        self.send(BrokerRequest::QueryPosition { reply });
        rx.await.unwrap_or(ABSENT_POSITION)
    }

    /// Miniplayer size, or `320x180` when there is none.
    pub async fn window_size(&self) -> Size {
        let (reply, rx) = oneshot::channel();
        self.send(BrokerRequest::QuerySize { reply });
        rx.await.unwrap_or(ABSENT_SIZE)
    }

    /// Usable area of the primary display.
    pub async fn screen_work_area(&self) -> WorkArea {
        let (reply, rx) = oneshot::channel();
        self.send(BrokerRequest::QueryWorkArea { reply });
        rx.await.unwrap_or(FALLBACK_WORK_AREA)
    }

    /// Whether a miniplayer window exists. Never blocks.
    pub fn miniplayer_exists(&self) -> bool {
        self.exists.get()
    }

    /// Stream of miniplayer existence changes.
    pub fn miniplayer_exists_monitored(&self) -> impl Stream<Item = bool> + Send {
        self.exists.watch()
    }

    /// Report that the host closed `window` on its own, e.g. the user
    /// closed it.
    pub fn notify_window_closed(&self, window: WindowId) {
        self.send(BrokerRequest::WindowClosed { window });
    }

    /// Ask the host to show an error dialog.
    pub fn show_error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(BrokerRequest::ShowError {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Attach a view. Main connects with no window; a miniplayer connects
    /// with the window it was launched in and is rejected if that window is
    /// no longer current, which closes its inbox.
    pub fn connect(&self, view: ViewId, window: Option<WindowId>) -> ViewLink {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let origin = Origin { view, window };
        self.send(BrokerRequest::Connect { origin, outbox });

        ViewLink {
            relay: Relay {
                origin,
                broker: self.clone(),
            },
            inbox,
        }
    }

    /// Stop the broker, closing any miniplayer.
    pub fn shutdown(&self) {
        self.send(BrokerRequest::Shutdown);
    }

    fn send(&self, request: BrokerRequest) {
        if self.requests.send(request).is_err() {
            debug!("Window broker has stopped, request dropped");
        }
    }
}

/// A view's sending side: relays messages stamped with the view's origin.
#[derive(Clone, Debug)]
pub struct Relay {
    origin: Origin,
    broker: BrokerHandle,
}

impl Relay {
    /// Send `message` to the peer view.
    pub fn send(&self, message: SyncMessage) {
        self.broker.relay(message, self.origin);
    }

    /// Who this relay speaks for
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The broker behind this relay
    pub fn broker(&self) -> &BrokerHandle {
        &self.broker
    }
}

/// A connected view's two directions.
#[derive(Debug)]
pub struct ViewLink {
    /// Outgoing messages
    pub relay: Relay,
    /// Incoming events; closes when the broker drops the view
    pub inbox: mpsc::UnboundedReceiver<ViewEvent>,
}
