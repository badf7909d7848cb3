use super::{AspectLock, PointerPosition, Position, Size, WorkArea, aspect::round_to_pixels};

/// Distance from a display edge at which the pointer counts as pinned there.
const EDGE_TOLERANCE: f64 = 1.0;

/// An in-progress aspect-locked resize driven from the corner grip.
///
/// Scaling follows the change in diagonal length, so the grip feels
/// proportional whichever direction the pointer travels. When the pointer
/// is pinned against the far edge of the work area, its intended position is
/// extrapolated so growth does not stall at the monitor boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    start_size: Size,
    start_position: Position,
    pointer_start: PointerPosition,
    area: WorkArea,
    lock: AspectLock,
}

impl ResizeSession {
    /// Capture the starting geometry at pointer-down on the grip.
    pub fn begin(
        start_size: Size,
        start_position: Position,
        pointer_start: PointerPosition,
        area: WorkArea,
        lock: AspectLock,
    ) -> Self {
        Self {
            start_size,
            start_position,
            pointer_start,
            area,
            lock,
        }
    }

    /// Window position when the resize began
    pub fn start_position(&self) -> Position {
        self.start_position
    }

    /// Size to request for the window given the current pointer.
    pub fn update(&self, pointer: PointerPosition) -> Size {
        let effective = self.effective_pointer(pointer);
        let dx = effective.x - self.pointer_start.x;
        let dy = effective.y - self.pointer_start.y;

        let scale = self.scale_for(dx, dy);
        let scaled = Size::new(
            round_to_pixels(f64::from(self.start_size.width) * scale),
            round_to_pixels(f64::from(self.start_size.height) * scale),
        );

        self.lock.fit(scaled)
    }

    /// Diagonal scale factor for a pointer displacement of `(dx, dy)`.
    pub fn scale_for(&self, dx: f64, dy: f64) -> f64 {
        let start_diagonal = self.start_size.diagonal();
        if start_diagonal <= 0.0 {
            return 1.0;
        }

        let width = f64::from(self.start_size.width) + dx;
        let height = f64::from(self.start_size.height) + dy;
        width.hypot(height) / start_diagonal
    }

    /// Pointer position after edge extrapolation on each axis.
    pub fn effective_pointer(&self, pointer: PointerPosition) -> PointerPosition {
        PointerPosition::new(
            extrapolate(self.pointer_start.x, pointer.x, f64::from(self.area.width)),
            extrapolate(self.pointer_start.y, pointer.y, f64::from(self.area.height)),
        )
    }
}

/// `start + (boundary - start) * max(1, (current - start) / (boundary - start))`,
/// applied only once the pointer has reached the boundary.
///
/// The `max(1, _)` guard means the result never falls back inside the
/// boundary while the pointer is pinned there.
pub fn extrapolate(start: f64, current: f64, boundary: f64) -> f64 {
    if current < boundary - EDGE_TOLERANCE {
        return current;
    }

    let travel = boundary - start;
    if travel.abs() < f64::EPSILON {
        return current;
    }

    let exhausted = (current - start) / travel;
    start + travel * exhausted.max(1.0)
}
