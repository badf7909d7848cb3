use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

use super::{MiniplayerOptions, WindowError, WindowHost, WindowId};
use crate::services::geometry::{Position, Size, WorkArea};

/// Lifecycle notifications from the headless host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A window was opened and is loading `options.url`
    Launched {
        /// New window
        id: WindowId,
        /// Options it was created with
        options: MiniplayerOptions,
    },
    /// A window was closed, by the broker or by the user
    Closed {
        /// Closed window
        id: WindowId,
    },
}

/// An error dialog the host was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub message: String,
}

/// Geometry of a window open on the headless host.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    /// Top-left corner
    pub position: Position,
    /// Current size
    pub size: Size,
    /// Minimum size
    pub min_size: Size,
    /// Options it was created with
    pub options: MiniplayerOptions,
}

#[derive(Debug)]
struct HostState {
    work_area: WorkArea,
    next_id: u64,
    windows: HashMap<WindowId, HeadlessWindow>,
    fail_next_create: Option<String>,
    dialogs: Vec<ErrorDialog>,
}

/// In-memory window host with no display.
///
/// Backs the CLI demo and the tests. Windows are plain records; lifecycle
/// changes are reported on the `HostEvent` channel returned by [`new`].
///
/// [`new`]: HeadlessHost::new
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Arc<RwLock<HostState>>,
    events_tx: mpsc::UnboundedSender<HostEvent>,
}

impl HeadlessHost {
    /// Create a host whose primary display has `work_area`.
    pub fn new(work_area: WorkArea) -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let host = Self {
            state: Arc::new(RwLock::new(HostState {
                work_area,
                next_id: 1,
                windows: HashMap::new(),
                fail_next_create: None,
                dialogs: Vec::new(),
            })),
            events_tx,
        };
        (host, events_rx)
    }

    /// Make the next `create_window` call fail with `reason`.
    pub async fn fail_next_create(&self, reason: impl Into<String>) {
        self.state.write().await.fail_next_create = Some(reason.into());
    }

    /// Close a window as if the user clicked its close button.
    ///
    /// Returns `false` if the window was not open.
    pub async fn close_by_user(&self, id: WindowId) -> bool {
        let removed = self.state.write().await.windows.remove(&id).is_some();
        if removed {
            info!(window = %id, "Window closed by user");
            let _ = self.events_tx.send(HostEvent::Closed { id });
        }
        removed
    }

    /// Ids of all open windows, oldest first.
    pub async fn open_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.state.read().await.windows.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Snapshot of an open window.
    pub async fn window(&self, id: WindowId) -> Option<HeadlessWindow> {
        self.state.read().await.windows.get(&id).cloned()
    }

    /// Error dialogs shown so far.
    pub async fn dialogs(&self) -> Vec<ErrorDialog> {
        self.state.read().await.dialogs.clone()
    }

    async fn with_window<T>(
        &self,
        id: WindowId,
        f: impl FnOnce(&mut HeadlessWindow) -> T,
    ) -> Result<T, WindowError> {
        let mut state = self.state.write().await;
        let window = state
            .windows
            .get_mut(&id)
            .ok_or(WindowError::WindowNotFound(id))?;
        Ok(f(window))
    }
}

#[async_trait]
impl WindowHost for HeadlessHost {
    async fn create_window(&self, options: &MiniplayerOptions) -> Result<WindowId, WindowError> {
        let id = {
            let mut state = self.state.write().await;
            if let Some(reason) = state.fail_next_create.take() {
                return Err(WindowError::CreationFailed(reason));
            }

            let id = WindowId::new(state.next_id);
            state.next_id += 1;
            state.windows.insert(
                id,
                HeadlessWindow {
                    position: options.position,
                    size: options.size,
                    min_size: options.min_size,
                    options: options.clone(),
                },
            );
            id
        };

        debug!(window = %id, url = %options.url, "Headless window created");
        let _ = self.events_tx.send(HostEvent::Launched {
            id,
            options: options.clone(),
        });
        Ok(id)
    }

    async fn destroy_window(&self, id: WindowId) -> Result<(), WindowError> {
        self.state
            .write()
            .await
            .windows
            .remove(&id)
            .ok_or(WindowError::WindowNotFound(id))?;
        let _ = self.events_tx.send(HostEvent::Closed { id });
        Ok(())
    }

    async fn set_position(&self, id: WindowId, position: Position) -> Result<(), WindowError> {
        self.with_window(id, |window| window.position = position).await
    }

    async fn set_size(&self, id: WindowId, size: Size) -> Result<(), WindowError> {
        self.with_window(id, |window| window.size = size).await
    }

    async fn set_min_size(&self, id: WindowId, size: Size) -> Result<(), WindowError> {
        self.with_window(id, |window| window.min_size = size).await
    }

    async fn position(&self, id: WindowId) -> Result<Position, WindowError> {
        self.with_window(id, |window| window.position).await
    }

    async fn size(&self, id: WindowId) -> Result<Size, WindowError> {
        self.with_window(id, |window| window.size).await
    }

    async fn work_area(&self) -> Result<WorkArea, WindowError> {
        Ok(self.state.read().await.work_area)
    }

    async fn show_error(&self, title: &str, message: &str) -> Result<(), WindowError> {
        info!(title, message, "Error dialog");
        self.state.write().await.dialogs.push(ErrorDialog {
            title: title.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
