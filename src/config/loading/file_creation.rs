use crate::{MiniplayError, Result};
use std::{fs, path::Path};

const DEFAULT_HEADER: &str = "\
# miniplay configuration file
#
# [sync]
# interval_ms = 1000
# drift_epsilon = 0.5
#
# [miniplayer]
# width = 320
# height = 180
";

/// Creates a default configuration file if it doesn't exist
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MiniplayError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::write(path, DEFAULT_HEADER).map_err(|e| {
        MiniplayError::Config(format!(
            "Failed to create config file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}
