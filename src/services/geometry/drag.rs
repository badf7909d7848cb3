use super::{PointerPosition, Position};

/// An in-progress window drag.
///
/// The window follows the pointer by the distance travelled since
/// pointer-down. No inertia, no snapping; clamping is left to the broker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    window_start: Position,
    pointer_start: PointerPosition,
}

impl DragSession {
    /// Capture the window and pointer positions at pointer-down.
    pub fn begin(window_start: Position, pointer_start: PointerPosition) -> Self {
        Self {
            window_start,
            pointer_start,
        }
    }

    /// Position to request for the window given the current pointer.
    pub fn update(&self, pointer: PointerPosition) -> Position {
        let dx = (pointer.x - self.pointer_start.x).round();
        let dy = (pointer.y - self.pointer_start.y).round();

        Position::new(
            offset(self.window_start.x, dx),
            offset(self.window_start.y, dy),
        )
    }

    /// Window position when the drag began
    pub fn window_start(&self) -> Position {
        self.window_start
    }
}

fn offset(origin: i32, delta: f64) -> i32 {
    let moved = f64::from(origin) + delta;
    moved.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
