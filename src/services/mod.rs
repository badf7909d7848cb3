/// Shared service building blocks
pub mod common;
/// Miniplayer window geometry
pub mod geometry;
/// Main and miniplayer views
pub mod player;
/// Video queue
pub mod queue;
/// External subtitle helper
pub mod subtitles;
/// Playback sync protocol
pub mod sync;
/// Window broker and hosts
pub mod window;

pub use player::{MainCommand, MainView, MiniplayerCommand, MiniplayerView, ViewHandle};
pub use sync::{MediaElement, PlayerState, SimulatedMedia, SyncMessage};
pub use window::{BrokerHandle, HeadlessHost, WindowHost};
