//! Playback synchronization between the main window and the miniplayer.
//!
//! Each view owns a `PlayerState` and a `SyncProtocol`. The protocol decides
//! which `SyncMessage`s to emit and how incoming ones fold into local state;
//! the window broker carries messages between the two.

mod error;
mod media;
mod message;
mod protocol;
mod state;

pub use error::SyncError;
pub use media::{MediaElement, SimulatedMedia};
pub use message::{GeometryRequest, MediaSource, SyncMessage, ViewId};
pub use protocol::{Reconciled, Role, SyncProtocol, SyncSettings};
pub use state::{PLAYBACK_RATE_PRESETS, PlayerState, SKIP_SECONDS, format_time};
