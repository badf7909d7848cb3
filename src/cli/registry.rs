use std::{collections::HashMap, sync::Arc};

use crate::config::Config;

use super::{
    CliError, Command,
    commands::{config, geometry, session, subtitles},
    formatting::{format_category, format_command, format_header, format_muted},
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// Commands are grouped by category and looked up by name within it:
///
/// ```text
/// registry
/// ├── config
/// │   ├── get
/// │   ├── path
/// │   ├── schema
/// │   └── show
/// ├── geometry
/// │   ├── clamp
/// │   ├── fit
/// │   └── place
/// ├── session
/// │   └── demo
/// └── subtitles
///     ├── extract
///     └── tracks
/// ```
pub struct CommandRegistry {
    /// category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config: Arc<Config>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    ///
    /// Commands are added with `register_command`, or all at once with
    /// `register_all_commands`.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            categories: HashMap::new(),
            config,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// The command's metadata name is its key within the category. A command
    /// with the same name replaces the previous one.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// `help` as the category, or an empty command name, renders help text
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command does
    /// not exist, `CliError::InvalidArguments` if the argument count is
    /// wrong. Other errors come from the command itself.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        if category == "help" {
            return Ok(self.help());
        }

        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        if command_name.is_empty() || command_name == "help" {
            return Ok(Self::category_help(category, found_category));
        }

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find command '{command_name}'"))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args).await
    }

    /// Lists all registered commands organized by category.
    ///
    /// Categories and commands are sorted alphabetically.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Names of all registered categories, sorted.
    pub fn get_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.categories.keys().cloned().collect();
        categories.sort();
        categories
    }

    fn help(&self) -> String {
        let mut help = format_header("miniplay commands");
        help.push('\n');
        for (category, commands) in self.list_commands() {
            help.push_str(&format!(
                "\n  {} {}",
                format_category(&category),
                format_muted(&commands.join(", "))
            ));
        }
        help.push_str(&format!(
            "\n\n{}",
            format_muted("Run 'miniplay <category>' for the commands in a category.")
        ));
        help
    }

    fn category_help(category: &str, commands: &HashMap<String, Box<dyn Command>>) -> String {
        let mut metadata: Vec<CommandMetadata> =
            commands.values().map(|command| command.metadata()).collect();
        metadata.sort_by(|a, b| a.name.cmp(&b.name));

        let mut help = format_header(category);
        for command in metadata {
            let args: Vec<String> = command
                .args
                .iter()
                .map(|arg| {
                    if arg.required {
                        format!("<{}>", arg.name)
                    } else {
                        format!("[{}]", arg.name)
                    }
                })
                .collect();

            help.push_str(&format!(
                "\n  {} {} {}",
                format_command(&command.name),
                args.join(" "),
                format_muted(&command.description)
            ));
            for example in &command.examples {
                help.push_str(&format!("\n      {}", format_muted(example)));
            }
        }
        help
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective categories.
    pub fn register_all_commands(&mut self) {
        let config = self.config.clone();
        config::register_commands(self, config.clone());
        geometry::register_commands(self, config.clone());
        session::register_commands(self, config.clone());
        subtitles::register_commands(self, config);
    }
}
