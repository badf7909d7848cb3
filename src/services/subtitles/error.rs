use std::path::PathBuf;

/// Failures running the subtitle helper
#[derive(thiserror::Error, Debug)]
pub enum SubtitleError {
    /// The helper process could not be started
    #[error("Failed to start subtitle helper '{program}': {source}")]
    Spawn {
        /// Interpreter that was run
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The helper exited unsuccessfully
    #[error("Subtitle helper exited with {status}: {message}")]
    ExitStatus {
        /// Exit status description
        status: String,
        /// Helper's error message, or its stderr
        message: String,
    },

    /// The helper's output was not a valid response
    #[error("Failed to parse subtitle helper output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The helper reported a failure of its own
    #[error("{0}")]
    Helper(String),

    /// The output directory could not be prepared
    #[error("Failed to prepare subtitle directory {path}: {source}")]
    OutputDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
