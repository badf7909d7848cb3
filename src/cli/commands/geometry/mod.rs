/// Window geometry commands
mod clamp;
mod fit;
mod place;
mod utils;

use std::sync::Arc;

pub use clamp::ClampCommand;
pub use fit::FitCommand;
pub use place::PlaceCommand;

use crate::{cli::CommandRegistry, config::Config};

/// Registers all geometry commands with the command registry
///
/// Registers commands in the "geometry" category for checking how the
/// miniplayer would be placed and sized on the headless display.
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "geometry";

    registry.register_command(CATEGORY_NAME, Box::new(ClampCommand::new(config.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(FitCommand::new(config.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(PlaceCommand::new(config)));
}
