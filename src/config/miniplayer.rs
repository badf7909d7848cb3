use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::geometry::{DEFAULT_MINIPLAYER_SIZE, EDGE_MARGIN, MIN_WIDTH, Size};

/// Page loaded into a new miniplayer window before startup parameters are appended.
pub const DEFAULT_LOAD_URL: &str = "app://miniplay/index.html";

/// Miniplayer window settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct MiniplayerConfig {
    /// Initial window width in pixels.
    pub width: u32,

    /// Initial window height in pixels.
    pub height: u32,

    /// Narrowest the window may be resized to.
    pub min_width: u32,

    /// Inset from the display edges for default top-right placement.
    pub edge_margin: u32,

    /// Keep the miniplayer above other windows.
    pub always_on_top: bool,

    /// Create the window without native decorations.
    pub frameless: bool,

    /// Base URL of the player page; startup parameters are added as a query string.
    pub load_url: String,
}

impl Default for MiniplayerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MINIPLAYER_SIZE.width,
            height: DEFAULT_MINIPLAYER_SIZE.height,
            min_width: MIN_WIDTH,
            edge_margin: EDGE_MARGIN,
            always_on_top: true,
            frameless: true,
            load_url: DEFAULT_LOAD_URL.to_string(),
        }
    }
}

impl MiniplayerConfig {
    /// Initial window size
    pub fn initial_size(&self) -> Size {
        Size::new(self.width.max(1), self.height.max(1))
    }
}
