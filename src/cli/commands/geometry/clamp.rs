use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_clamped,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
    services::geometry::{Position, Size, clamp_position},
    session::HEADLESS_WORK_AREA,
};

use super::utils::{parse_arg, parse_optional};

/// Shows where a requested miniplayer position ends up after clamping.
pub struct ClampCommand {
    config: Arc<Config>,
}

impl ClampCommand {
    /// Creates a new ClampCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for ClampCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let x: i32 = parse_arg("x", &args[0])?;
        let y: i32 = parse_arg("y", &args[1])?;

        let initial = self.config.miniplayer.initial_size();
        let size = Size::new(
            parse_optional(args, 2, "width")?.unwrap_or(initial.width),
            parse_optional(args, 3, "height")?.unwrap_or(initial.height),
        );

        let requested = Position::new(x, y);
        let clamped = clamp_position(requested, size, HEADLESS_WORK_AREA);
        Ok(format!(
            "{} for a {size} window on {HEADLESS_WORK_AREA}",
            format_clamped(requested, clamped)
        ))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "clamp".to_string(),
            description: "Clamp a window position to the display".to_string(),
            category: "geometry".to_string(),
            args: vec![
                CommandArg {
                    name: "x".to_string(),
                    description: "Requested left edge".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "y".to_string(),
                    description: "Requested top edge".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "width".to_string(),
                    description: "Window width (default: configured width)".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "height".to_string(),
                    description: "Window height (default: configured height)".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec![
                "miniplay geometry clamp 2420 -200".to_string(),
                "miniplay geometry clamp 1800 900 640 360".to_string(),
            ],
        }
    }
}
