//! Configuration inspection commands.
mod get;
mod path;
mod schema;
mod show;

use std::sync::Arc;

pub use get::GetCommand;
pub use path::PathCommand;
pub use schema::SchemaCommand;
pub use show::ShowCommand;

use crate::{cli::CommandRegistry, config::Config};

/// Registers all configuration-related commands with the command registry.
///
/// Registers commands in the "config" category for reading the loaded
/// configuration, its location and its schema.
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(CATEGORY_NAME, Box::new(GetCommand::new(config.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ShowCommand::new(config)));
    registry.register_command(CATEGORY_NAME, Box::new(PathCommand::new()));
    registry.register_command(CATEGORY_NAME, Box::new(SchemaCommand::new()));
}
