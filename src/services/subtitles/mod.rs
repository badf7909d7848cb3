//! Subtitle track discovery and extraction through an external helper.

mod error;
mod helper;
mod types;

pub use error::SubtitleError;
pub use helper::SubtitleHelper;
pub use types::{SubtitleResponse, SubtitleTrack};
