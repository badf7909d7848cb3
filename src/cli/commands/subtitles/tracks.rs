use std::{path::Path, sync::Arc};

use async_trait::async_trait;

use crate::{
    cli::{
        Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
};

use super::{helper, into_result};

/// Lists the subtitle tracks embedded in a video file.
pub struct TracksCommand {
    config: Arc<Config>,
}

impl TracksCommand {
    /// Creates a new TracksCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for TracksCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let file = Path::new(&args[0]);
        let tracks = into_result(helper(&self.config)?.tracks(file).await)?;

        if tracks.is_empty() {
            return Ok(format!("No subtitle tracks in {}", file.display()));
        }

        let lines: Vec<String> = tracks
            .iter()
            .map(|track| {
                format!(
                    "{:>3}  {:<5} {}",
                    track.stream_index,
                    track.language.as_deref().unwrap_or("und"),
                    track.title.as_deref().unwrap_or("")
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "tracks".to_string(),
            description: "List subtitle tracks in a video".to_string(),
            category: "subtitles".to_string(),
            args: vec![CommandArg {
                name: "file".to_string(),
                description: "Video file".to_string(),
                required: true,
                value_type: ArgType::Path,
            }],
            examples: vec!["miniplay subtitles tracks ~/Videos/movie.mkv".to_string()],
        }
    }
}
