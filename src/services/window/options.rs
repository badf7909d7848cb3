use url::Url;

use crate::{
    config::MiniplayerConfig,
    services::geometry::{DEFAULT_ASPECT_RATIO, DEFAULT_MINIPLAYER_SIZE, Position, Size},
};

/// Everything a host needs to open the miniplayer window.
///
/// Built with [`MiniplayerOptions::builder`]; the broker is the only caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniplayerOptions {
    /// Initial size
    pub size: Size,
    /// Initial top-left corner, already clamped to the work area
    pub position: Position,
    /// Smallest size the host should allow
    pub min_size: Size,
    /// Width / height ratio the host should keep
    pub aspect_ratio: f64,
    /// Keep above other windows
    pub always_on_top: bool,
    /// Hide native decorations
    pub frameless: bool,
    /// Page to load, carrying startup parameters
    pub url: Url,
}

impl MiniplayerOptions {
    /// Start building options for a window loading `url`.
    pub fn builder(url: Url) -> MiniplayerOptionsBuilder {
        MiniplayerOptionsBuilder {
            options: MiniplayerOptions {
                size: DEFAULT_MINIPLAYER_SIZE,
                position: Position::new(0, 0),
                min_size: DEFAULT_MINIPLAYER_SIZE,
                aspect_ratio: DEFAULT_ASPECT_RATIO,
                always_on_top: true,
                frameless: true,
                url,
            },
        }
    }
}

/// Builder for [`MiniplayerOptions`]
#[derive(Debug, Clone)]
pub struct MiniplayerOptionsBuilder {
    options: MiniplayerOptions,
}

impl MiniplayerOptionsBuilder {
    /// Initial size
    pub fn size(mut self, size: Size) -> Self {
        self.options.size = size;
        self
    }

    /// Initial position
    pub fn position(mut self, position: Position) -> Self {
        self.options.position = position;
        self
    }

    /// Minimum size
    pub fn min_size(mut self, min_size: Size) -> Self {
        self.options.min_size = min_size;
        self
    }

    /// Locked aspect ratio
    pub fn aspect_ratio(mut self, ratio: f64) -> Self {
        self.options.aspect_ratio = ratio;
        self
    }

    /// Window chrome flags from configuration
    pub fn chrome(mut self, config: &MiniplayerConfig) -> Self {
        self.options.always_on_top = config.always_on_top;
        self.options.frameless = config.frameless;
        self
    }

    /// Finish building
    pub fn build(self) -> MiniplayerOptions {
        self.options
    }
}
