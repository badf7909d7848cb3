/// Subtitle helper commands
mod extract;
mod tracks;

use std::sync::Arc;

pub use extract::ExtractCommand;
pub use tracks::TracksCommand;

use crate::{
    cli::{CliError, CommandRegistry},
    config::Config,
    services::subtitles::{SubtitleHelper, SubtitleResponse, SubtitleTrack},
};

/// Registers all subtitle commands with the command registry
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "subtitles";

    registry.register_command(CATEGORY_NAME, Box::new(TracksCommand::new(config.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ExtractCommand::new(config)));
}

fn helper(config: &Config) -> Result<SubtitleHelper, CliError> {
    SubtitleHelper::from_config(&config.subtitles).map_err(|e| CliError::ServiceError {
        service: "Subtitles".to_string(),
        details: e.to_string(),
    })
}

fn into_result(response: SubtitleResponse) -> Result<Vec<SubtitleTrack>, CliError> {
    if response.success {
        return Ok(response.tracks);
    }
    Err(CliError::ServiceError {
        service: "Subtitles".to_string(),
        details: response
            .error
            .unwrap_or_else(|| "Unknown error occurred".to_string()),
    })
}
