use super::WindowId;

/// Errors reported by a window host
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    /// The host refused or failed to open a window
    #[error("Failed to create window: {0}")]
    CreationFailed(String),

    /// The window was already destroyed or never existed
    #[error("Window {0} not found")]
    WindowNotFound(WindowId),

    /// The miniplayer load URL could not be built
    #[error("Invalid load URL '{url}': {details}")]
    InvalidUrl {
        /// URL as configured
        url: String,
        /// Parser error
        details: String,
    },

    /// A load URL did not carry usable miniplayer parameters
    #[error("Invalid miniplayer startup parameters: {0}")]
    InvalidStartupParams(String),

    /// The host process is gone
    #[error("Window host unavailable")]
    HostUnavailable,
}
