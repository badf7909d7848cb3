use async_trait::async_trait;

use super::{MiniplayerOptions, WindowError, WindowId};
use crate::services::geometry::{Position, Size, WorkArea};

/// Native window operations the broker is built on.
///
/// Implemented by the platform shell. Every call may fail if the window is
/// already gone; the broker turns those failures into defaults so they never
/// reach view code.
#[async_trait]
pub trait WindowHost: Send + Sync + 'static {
    /// Open a miniplayer window and start loading its URL.
    async fn create_window(&self, options: &MiniplayerOptions) -> Result<WindowId, WindowError>;

    /// Close and release a window. The id is never reused.
    async fn destroy_window(&self, id: WindowId) -> Result<(), WindowError>;

    /// Move a window's top-left corner.
    async fn set_position(&self, id: WindowId, position: Position) -> Result<(), WindowError>;

    /// Resize a window.
    async fn set_size(&self, id: WindowId, size: Size) -> Result<(), WindowError>;

    /// Set the smallest size the user may shrink a window to.
    async fn set_min_size(&self, id: WindowId, size: Size) -> Result<(), WindowError>;

    /// Current top-left corner of a window.
    async fn position(&self, id: WindowId) -> Result<Position, WindowError>;

    /// Current size of a window.
    async fn size(&self, id: WindowId) -> Result<Size, WindowError>;

    /// Usable area of the primary display.
    async fn work_area(&self) -> Result<WorkArea, WindowError>;

    /// Show a modal error message to the user.
    async fn show_error(&self, title: &str, message: &str) -> Result<(), WindowError>;
}
