use tokio::sync::{mpsc, oneshot};

use crate::services::{
    geometry::{Position, Size, WorkArea},
    sync::{SyncMessage, ViewId},
    window::{MiniplayerLaunch, ViewEvent, WindowId},
};

/// Channel sender for requests to the broker task
pub(super) type RequestSender = mpsc::UnboundedSender<BrokerRequest>;

/// Channel receiver drained by the broker task
pub(super) type RequestReceiver = mpsc::UnboundedReceiver<BrokerRequest>;

/// Channel sender for events delivered to a view
pub(super) type ViewOutbox = mpsc::UnboundedSender<ViewEvent>;

/// Where a relayed message came from.
///
/// The window id lets the broker discard messages from a miniplayer that has
/// already been replaced by a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Sending view
    pub view: ViewId,
    /// Sending window, for the miniplayer
    pub window: Option<WindowId>,
}

impl Origin {
    /// The main view
    pub const fn main() -> Self {
        Self {
            view: ViewId::Main,
            window: None,
        }
    }

    /// A miniplayer hosted in `window`
    pub const fn miniplayer(window: WindowId) -> Self {
        Self {
            view: ViewId::Miniplayer,
            window: Some(window),
        }
    }
}

/// Everything the broker task can be asked to do.
#[derive(Debug)]
pub(super) enum BrokerRequest {
    Connect {
        origin: Origin,
        outbox: ViewOutbox,
    },
    Toggle {
        launch: MiniplayerLaunch,
        reply: oneshot::Sender<bool>,
    },
    CloseMiniplayer {
        window: WindowId,
    },
    Relay {
        message: SyncMessage,
        origin: Origin,
    },
    SetPosition {
        position: Position,
    },
    Resize {
        size: Size,
    },
    UpdateAspectRatio {
        ratio: f64,
    },
    QueryPosition {
        reply: oneshot::Sender<Position>,
    },
    QuerySize {
        reply: oneshot::Sender<Size>,
    },
    QueryWorkArea {
        reply: oneshot::Sender<WorkArea>,
    },
    WindowClosed {
        window: WindowId,
    },
    ShowError {
        title: String,
        message: String,
    },
    Shutdown,
}
