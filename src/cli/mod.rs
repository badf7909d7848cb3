//! Command-line interface.
//!
//! Provides a hierarchical command system for inspecting configuration,
//! checking miniplayer geometry, running the subtitle helper and driving a
//! headless session. Commands are organized by category and help text is
//! generated from their metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use commands::config::GetCommand;
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
