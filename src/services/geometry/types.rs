use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer screen coordinates of a window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the left edge of the display
    pub x: i32,
    /// Vertical offset from the top edge of the display
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel dimensions of a window or display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a size from its dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the diagonal, used for proportional resize scaling
    pub fn diagonal(&self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Usable area of the primary display, excluding docks and taskbars.
///
/// Origin is always `(0, 0)`; only the extent varies between displays.
pub type WorkArea = Size;

/// A pointer location in screen space.
///
/// Kept fractional because pointer devices report sub-pixel positions and
/// the resize extrapolation divides by travel distances.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal screen coordinate
    pub x: f64,
    /// Vertical screen coordinate
    pub y: f64,
}

impl PointerPosition {
    /// Create a pointer position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which part of the miniplayer surface a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Bare video surface; starts a drag
    Surface,
    /// An interactive control such as the play button; never starts a drag
    Control,
    /// The bottom-right resize grip
    ResizeHandle,
}
