use std::{path::Path, sync::Arc};

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
};

use super::{helper, into_result};

/// Extracts one subtitle track to an `.srt` file.
pub struct ExtractCommand {
    config: Arc<Config>,
}

impl ExtractCommand {
    /// Creates a new ExtractCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for ExtractCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let file = Path::new(&args[0]);
        let index = args[1]
            .parse::<u32>()
            .map_err(|_| CliError::InvalidArgument {
                arg: "index".to_string(),
                reason: format!("'{}' is not a track index", args[1]),
            })?;

        let helper = helper(&self.config)?;
        let tracks = into_result(helper.extract(file, index).await)?;

        let output = tracks
            .first()
            .and_then(|track| track.output_file.clone())
            .unwrap_or_else(|| helper.output_file_for(file));
        Ok(format!("Extracted track {index} to {}", output.display()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "extract".to_string(),
            description: "Extract a subtitle track to .srt".to_string(),
            category: "subtitles".to_string(),
            args: vec![
                CommandArg {
                    name: "file".to_string(),
                    description: "Video file".to_string(),
                    required: true,
                    value_type: ArgType::Path,
                },
                CommandArg {
                    name: "index".to_string(),
                    description: "Subtitle stream index from 'tracks'".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec!["miniplay subtitles extract ~/Videos/movie.mkv 0".to_string()],
        }
    }
}
