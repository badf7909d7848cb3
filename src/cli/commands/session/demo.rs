use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{format_label, format_placement, format_playback},
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
    services::{
        player::MainCommand,
        queue::VideoQueueEntry,
        sync::{MediaSource, PlayerState},
    },
    session::{HEADLESS_WORK_AREA, Session},
};

const DEFAULT_SECONDS: f64 = 2.0;
const MAX_SECONDS: f64 = 60.0;
const HANDOFF_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a scripted main/miniplayer session on the headless host.
///
/// Plays a source in the main view, opens the miniplayer, keeps playing,
/// then closes it again and reports each state along the way. Useful for
/// checking sync settings without a display.
pub struct DemoCommand {
    config: Arc<Config>,
}

impl DemoCommand {
    /// Creates a new DemoCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    fn parse_seconds(args: &[String]) -> Result<f64, CliError> {
        let Some(raw) = args.get(1) else {
            return Ok(DEFAULT_SECONDS);
        };

        match raw.parse::<f64>() {
            Ok(seconds) if seconds > 0.0 && seconds <= MAX_SECONDS => Ok(seconds),
            _ => Err(CliError::InvalidArgument {
                arg: "seconds".to_string(),
                reason: format!("Expected a number of seconds in (0, {MAX_SECONDS}]"),
            }),
        }
    }

    fn entry_for(source: &str) -> VideoQueueEntry {
        if source.contains("://") {
            let name = source.rsplit('/').next().unwrap_or(source);
            VideoQueueEntry::new(name, MediaSource::new(source))
        } else {
            VideoQueueEntry::from_file(source)
        }
    }
}

fn describe(label: &str, state: &PlayerState) -> String {
    format!("{} {}", format_label(label), format_playback(state))
}

fn not_running(view: &str) -> CliError {
    CliError::ServiceError {
        service: "Session".to_string(),
        details: format!("{view} view stopped unexpectedly"),
    }
}

#[async_trait]
impl Command for DemoCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let entry = Self::entry_for(&args[0]);
        let hold = Duration::from_secs_f64(Self::parse_seconds(args)?);

        let session = Session::start(&self.config, HEADLESS_WORK_AREA);
        let main = session.main().clone();
        let mut transcript = vec![format!("{} {}", format_label("source"), entry.source)];

        if !main.perform(MainCommand::Load(entry)).await {
            return Err(not_running("Main"));
        }
        time::sleep(hold).await;
        transcript.push(describe("main", &main.state()));

        let Some(miniplayer) = session.toggle_miniplayer().await else {
            session.shutdown().await;
            return Err(CliError::ServiceError {
                service: "Window".to_string(),
                details: "Miniplayer did not open".to_string(),
            });
        };

        let position = session.broker().window_position().await;
        let size = session.broker().window_size().await;
        transcript.push(format!(
            "{} {}",
            format_label("window"),
            format_placement(size, position)
        ));
        transcript.push(describe("miniplayer", &miniplayer.view.state()));

        time::sleep(hold).await;
        let before_close = miniplayer.view.state();
        transcript.push(describe("miniplayer", &before_close));

        session.toggle_miniplayer().await;
        time::timeout(HANDOFF_TIMEOUT, miniplayer.view.closed())
            .await
            .map_err(|_| not_running("Miniplayer"))?;
        let handed_back = time::timeout(
            HANDOFF_TIMEOUT,
            main.wait_until(|state| (state.current_time - before_close.current_time).abs() < 1.0),
        )
        .await
        .ok()
        .flatten()
        .ok_or_else(|| not_running("Main"))?;
        transcript.push(describe("main", &handed_back));

        session.shutdown().await;
        Ok(transcript.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "demo".to_string(),
            description: "Run a headless miniplayer round trip".to_string(),
            category: "session".to_string(),
            args: vec![
                CommandArg {
                    name: "source".to_string(),
                    description: "Video file or URL".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                CommandArg {
                    name: "seconds".to_string(),
                    description: "How long each view plays (default 2)".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec![
                "miniplay session demo ~/Videos/movie.mp4".to_string(),
                "miniplay session demo https://example.com/clip.webm 5".to_string(),
            ],
        }
    }
}
