use crate::services::sync::SKIP_SECONDS;

/// Volume change per arrow-key press.
pub const VOLUME_STEP: f64 = 0.1;

/// A player keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Space or `k`
    TogglePlay,
    /// Left arrow or `j`
    SkipBackward,
    /// Right arrow or `l`
    SkipForward,
    /// `m`
    ToggleMute,
    /// Up arrow
    VolumeUp,
    /// Down arrow
    VolumeDown,
    /// Escape; closes the miniplayer
    Close,
}

impl Shortcut {
    /// Map a key name, as reported by the shell, to a shortcut.
    pub fn from_key(key: &str) -> Option<Self> {
        let shortcut = match key {
            " " | "Space" | "k" | "K" => Self::TogglePlay,
            "ArrowLeft" | "j" | "J" => Self::SkipBackward,
            "ArrowRight" | "l" | "L" => Self::SkipForward,
            "m" | "M" => Self::ToggleMute,
            "ArrowUp" => Self::VolumeUp,
            "ArrowDown" => Self::VolumeDown,
            "Escape" => Self::Close,
            _ => return None,
        };
        Some(shortcut)
    }

    /// Seconds to skip, for the skip shortcuts.
    pub fn skip_delta(self) -> Option<f64> {
        match self {
            Self::SkipBackward => Some(-SKIP_SECONDS),
            Self::SkipForward => Some(SKIP_SECONDS),
            _ => None,
        }
    }

    /// Volume change, for the volume shortcuts.
    pub fn volume_delta(self) -> Option<f64> {
        match self {
            Self::VolumeUp => Some(VOLUME_STEP),
            Self::VolumeDown => Some(-VOLUME_STEP),
            _ => None,
        }
    }
}
