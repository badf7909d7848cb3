use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_toml_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    config::Config,
};

/// Command for reading a single configuration value.
///
/// # Example Usage
///
/// ```bash
/// miniplay config get sync.drift_epsilon
/// miniplay config get miniplayer.always_on_top
/// ```
pub struct GetCommand {
    config: Arc<Config>,
}

impl GetCommand {
    /// Creates a new GetCommand reading from `config`.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for GetCommand {
    /// Looks up the dotted `path` and formats the value.
    ///
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If no path argument is provided
    /// * `CliError::ConfigError` - If the path does not exist
    async fn execute(&self, args: &[String]) -> CommandResult {
        let path = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <path> argument for 'get' command".to_string())
        })?;

        let value = self
            .config
            .value_at(path)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        Ok(format!("{}: {}", path, format_toml_value(&value)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get configuration value".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: "path".to_string(),
                description: "Configuration path (e.g., sync.drift_epsilon)".to_string(),
                required: true,
                value_type: ArgType::Path,
            }],
            examples: vec![
                "miniplay config get sync.drift_epsilon".to_string(),
                "miniplay config get miniplayer.width".to_string(),
                "miniplay config get general.log_level".to_string(),
            ],
        }
    }
}
