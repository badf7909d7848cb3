//! Window geometry for the frameless miniplayer.
//!
//! The miniplayer has no native title bar or resize border, so dragging and
//! resizing are computed here from raw pointer deltas and then requested
//! from the window broker.

/// Aspect-ratio locked sizing
pub mod aspect;
/// Work-area clamping and default placement
pub mod bounds;
/// Pointer-driven window dragging
pub mod drag;
/// Diagonal-scaling corner resize
pub mod resize;
/// Geometry value types
pub mod types;

pub use aspect::{AspectLock, DEFAULT_ASPECT_RATIO, MIN_WIDTH, ratio_of};
pub use bounds::{EDGE_MARGIN, clamp_position, fits_within, initial_placement, top_right};
pub use drag::DragSession;
pub use resize::ResizeSession;
pub use types::{PointerPosition, PointerTarget, Position, Size, WorkArea};

/// Default miniplayer size (16:9)
pub const DEFAULT_MINIPLAYER_SIZE: Size = Size::new(320, 180);
