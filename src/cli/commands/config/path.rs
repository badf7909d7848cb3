use async_trait::async_trait;

use crate::{
    cli::{Command, CommandResult, types::CommandMetadata},
    config::ConfigPaths,
};

/// Prints where the main configuration file lives.
pub struct PathCommand;

impl PathCommand {
    /// Creates a new PathCommand
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Command for PathCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let path = ConfigPaths::main_config()?;
        Ok(path.display().to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "path".to_string(),
            description: "Print the configuration file path".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["miniplay config path".to_string()],
        }
    }
}

