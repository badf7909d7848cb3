//! The two player views and the runtime that drives them.
//!
//! [`MainView`] and [`MiniplayerView`] each own their playback state and
//! media element and talk only through the window broker. Both run on the
//! same event loop from [`spawn_view`]: a sync tick, broker events, and UI
//! commands.

mod core;
mod main_view;
mod miniplayer_view;
mod runtime;
mod shortcuts;

#[cfg(test)]
mod tests;

pub use main_view::{MainCommand, MainView};
pub use miniplayer_view::{MiniplayerCommand, MiniplayerView};
pub use runtime::{ViewHandle, ViewTask, spawn_view};
pub use shortcuts::{Shortcut, VOLUME_STEP};
