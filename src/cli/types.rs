use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong number of arguments for a command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A single argument could not be used.
    ///
    /// Carries the argument name so the message can point at it.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name from the command metadata
        arg: String,
        /// Why it was rejected
        reason: String,
    },

    /// An error occurred in the configuration system.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A service the command depends on failed.
    #[error("{service} error: {details}")]
    ServiceError {
        /// Service name
        service: String,
        /// What went wrong
        details: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for command execution results.
///
/// Commands return their output as a String, or a CliError describing what
/// went wrong.
pub type CommandResult = Result<String, CliError>;

/// One argument a command accepts.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "path", "file").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for validation and help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A numeric value (integer or float).
    Number,

    /// A file system path or configuration path.
    Path,
}

/// Complete metadata for a CLI command.
///
/// The single source of truth for a command's identity, arguments, usage
/// examples and category. Used for help generation and argument count
/// validation.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "tracks").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Arguments this command accepts, in order.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "config", "geometry").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against the
    /// command's metadata; the command validates the values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values or a failing service.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
