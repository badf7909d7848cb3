use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_placement,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
    services::geometry::{Position, initial_placement},
    session::HEADLESS_WORK_AREA,
};

use super::utils::parse_optional;

/// Shows where a new miniplayer would open.
pub struct PlaceCommand {
    config: Arc<Config>,
}

impl PlaceCommand {
    /// Creates a new PlaceCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for PlaceCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let x: Option<i32> = parse_optional(args, 0, "x")?;
        let y: Option<i32> = parse_optional(args, 1, "y")?;

        let requested = match (x, y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            (None, None) => None,
            _ => {
                return Err(CliError::InvalidArgument {
                    arg: "y".to_string(),
                    reason: "Give both x and y, or neither".to_string(),
                });
            }
        };

        let miniplayer = &self.config.miniplayer;
        let size = miniplayer.initial_size();
        let position = initial_placement(requested, size, HEADLESS_WORK_AREA, miniplayer.edge_margin);

        Ok(format_placement(size, position))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "place".to_string(),
            description: "Show where a new miniplayer opens".to_string(),
            category: "geometry".to_string(),
            args: vec![
                CommandArg {
                    name: "x".to_string(),
                    description: "Remembered left edge".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "y".to_string(),
                    description: "Remembered top edge".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec![
                "miniplay geometry place".to_string(),
                "miniplay geometry place 100 100".to_string(),
            ],
        }
    }
}
