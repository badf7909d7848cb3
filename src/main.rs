//! miniplay command-line entry point.
//!
//! One-shot commands log warnings to stderr only; the headless session also
//! writes a rotated log file so a run can be inspected afterwards.

use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use miniplay::{
    cli::{CliService, formatting::format_error},
    config::Config,
    tracing_config,
};
use tracing::info;

/// Main-window/miniplayer video player tools.
#[derive(Parser, Debug)]
#[command(name = "miniplay", version, about)]
struct Args {
    /// Configuration file (default: $XDG_CONFIG_HOME/miniplay/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Command category, or `help`
    #[arg(default_value = "help")]
    category: String,

    /// Command within the category
    command: Option<String>,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let _guard = if args.category == "session" {
        let guard = tracing_config::init_with_file(config.general.log_level)?;
        info!("Starting headless session");
        Some(guard)
    } else {
        tracing_config::init_cli_mode()?;
        None
    };

    let cli_service = CliService::new(config);
    let command = args.command.as_deref().unwrap_or("");

    match cli_service
        .execute_command(&args.category, command, &args.args)
        .await
    {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
