//! miniplay - a video player with a synchronized floating miniplayer.
//!
//! A main view and a frameless, always-on-top miniplayer play the same
//! media while only one of them drives playback at a time. The pieces:
//!
//! - A window broker that owns the miniplayer window and relays typed sync
//!   messages between the two views
//! - A sync protocol that keeps time and play state aligned within a small
//!   drift tolerance, and hands playback back when the miniplayer closes
//! - A geometry engine for aspect-locked resizing, dragging and placement
//!   of the miniplayer on screen
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use miniplay::{config::Config, session::{HEADLESS_WORK_AREA, Session}};
//!
//! # async fn run() {
//! let session = Session::start(&Config::default(), HEADLESS_WORK_AREA);
//! let miniplayer = session.toggle_miniplayer().await;
//! println!("miniplayer open: {}", miniplayer.is_some());
//! session.shutdown().await;
//! # }
//! ```

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Player services: broker, sync, geometry and views.
pub mod services;

/// Headless session wiring.
pub mod session;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{MiniplayError, Result};
