use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_fit,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
    services::geometry::AspectLock,
};

use super::utils::{parse_arg, parse_ratio};

/// Shows the size a resize request settles on under an aspect ratio.
pub struct FitCommand {
    config: Arc<Config>,
}

impl FitCommand {
    /// Creates a new FitCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for FitCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let width: u32 = parse_arg("width", &args[0])?;
        let ratio = parse_ratio(&args[1])?;

        let lock = AspectLock::new(ratio, self.config.miniplayer.min_width);
        Ok(format_fit(lock.fit_width(width), lock.min_size()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "fit".to_string(),
            description: "Size a window to an aspect ratio".to_string(),
            category: "geometry".to_string(),
            args: vec![
                CommandArg {
                    name: "width".to_string(),
                    description: "Requested width".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "ratio".to_string(),
                    description: "Aspect ratio: 1.78, 16:9 or 1920x1080".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
            ],
            examples: vec![
                "miniplay geometry fit 400 4:3".to_string(),
                "miniplay geometry fit 150 2.39".to_string(),
            ],
        }
    }
}
