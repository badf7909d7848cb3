//! Miniplayer window lifecycle and message relay.
//!
//! The [`BrokerHandle`] is the only owner of the miniplayer window. Views
//! never address each other; they connect to the broker and relay through
//! it. Native windows are reached through the [`WindowHost`] trait, with
//! [`HeadlessHost`] as an in-memory implementation.

mod broker;
mod error;
mod headless;
mod host;
mod options;
mod startup;
mod types;

#[cfg(test)]
mod tests;

pub use broker::{BrokerHandle, Origin, Relay, ViewLink};
pub use error::WindowError;
pub use headless::{ErrorDialog, HeadlessHost, HeadlessWindow, HostEvent};
pub use host::WindowHost;
pub use options::{MiniplayerOptions, MiniplayerOptionsBuilder};
pub use startup::StartupParams;
pub use types::{MiniplayerLaunch, ViewEvent, WindowId};
