/// Headless session commands
mod demo;

use std::sync::Arc;

pub use demo::DemoCommand;

use crate::{cli::CommandRegistry, config::Config};

/// Registers all session commands with the command registry
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "session";

    registry.register_command(CATEGORY_NAME, Box::new(DemoCommand::new(config)));
}
