use super::{Position, Size, WorkArea};

/// Margin kept between a freshly placed miniplayer and the display edges.
pub const EDGE_MARGIN: u32 = 20;

/// Clamp a window position so the whole window stays inside the work area.
///
/// A window larger than the work area is pinned to the origin rather than
/// pushed to a negative offset.
pub fn clamp_position(position: Position, window: Size, area: WorkArea) -> Position {
    let max_x = span(area.width, window.width);
    let max_y = span(area.height, window.height);

    Position {
        x: position.x.clamp(0, max_x),
        y: position.y.clamp(0, max_y),
    }
}

/// Whether a window placed at `position` lies entirely inside the work area.
pub fn fits_within(position: Position, window: Size, area: WorkArea) -> bool {
    clamp_position(position, window, area) == position
}

/// Default placement for a new miniplayer: top-right corner, inset by `margin`.
pub fn top_right(window: Size, area: WorkArea, margin: u32) -> Position {
    let x = i64::from(area.width) - i64::from(window.width) - i64::from(margin);
    let y = i64::from(margin);

    clamp_position(
        Position::new(saturate(x), saturate(y)),
        window,
        area,
    )
}

/// Resolve where a new miniplayer should appear.
///
/// A requested position is honoured when the window fits there; otherwise the
/// top-right default is used. The result is always clamped.
pub fn initial_placement(
    requested: Option<Position>,
    window: Size,
    area: WorkArea,
    margin: u32,
) -> Position {
    match requested {
        Some(position) if fits_within(position, window, area) => position,
        _ => top_right(window, area, margin),
    }
}

fn span(outer: u32, inner: u32) -> i32 {
    saturate(i64::from(outer) - i64::from(inner)).max(0)
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: WorkArea = Size::new(1920, 1080);
    const WINDOW: Size = Size::new(320, 180);

    #[test]
    fn clamps_far_offscreen_position_into_bounds() {
        let clamped = clamp_position(Position::new(1920 + 500, -200), WINDOW, SCREEN);
        assert_eq!(clamped, Position::new(1600, 0));
    }

    #[test]
    fn leaves_in_bounds_position_untouched() {
        let position = Position::new(100, 200);
        assert_eq!(clamp_position(position, WINDOW, SCREEN), position);
        assert!(fits_within(position, WINDOW, SCREEN));
    }

    #[test]
    fn oversized_window_pins_to_origin() {
        let huge = Size::new(4000, 3000);
        assert_eq!(
            clamp_position(Position::new(50, 50), huge, SCREEN),
            Position::new(0, 0)
        );
    }

    #[test]
    fn exact_far_corner_is_allowed() {
        let corner = Position::new(1600, 900);
        assert_eq!(clamp_position(corner, WINDOW, SCREEN), corner);
    }

    #[test]
    fn default_placement_is_top_right_with_margin() {
        assert_eq!(
            top_right(WINDOW, SCREEN, EDGE_MARGIN),
            Position::new(1920 - 320 - 20, 20)
        );
    }

    #[test]
    fn out_of_bounds_request_falls_back_to_default() {
        let placed = initial_placement(Some(Position::new(-10, 10)), WINDOW, SCREEN, EDGE_MARGIN);
        assert_eq!(placed, top_right(WINDOW, SCREEN, EDGE_MARGIN));

        let placed = initial_placement(Some(Position::new(40, 60)), WINDOW, SCREEN, EDGE_MARGIN);
        assert_eq!(placed, Position::new(40, 60));

        let placed = initial_placement(None, WINDOW, SCREEN, EDGE_MARGIN);
        assert_eq!(placed, Position::new(1580, 20));
    }
}
