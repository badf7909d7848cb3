use super::Size;

/// Default miniplayer aspect ratio before any media reports its own.
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Narrowest the miniplayer may become, in pixels.
pub const MIN_WIDTH: u32 = 200;

/// Width-driven sizing rule with a locked aspect ratio.
///
/// Height is never set independently: it is always derived from the width,
/// and the width is floored at `min_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectLock {
    ratio: f64,
    min_width: u32,
}

impl Default for AspectLock {
    fn default() -> Self {
        Self::new(DEFAULT_ASPECT_RATIO, MIN_WIDTH)
    }
}

impl AspectLock {
    /// Create a lock for `ratio` (width / height).
    ///
    /// Non-finite or non-positive ratios fall back to 16:9.
    pub fn new(ratio: f64, min_width: u32) -> Self {
        Self {
            ratio: sanitize_ratio(ratio),
            min_width,
        }
    }

    /// The locked width / height ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The width floor
    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    /// Height of a window at the minimum width.
    pub fn min_height(&self) -> u32 {
        self.height_for(self.min_width)
    }

    /// Smallest size the window may take under this lock.
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height())
    }

    /// Replace the ratio, keeping the width floor.
    pub fn with_ratio(self, ratio: f64) -> Self {
        Self::new(ratio, self.min_width)
    }

    /// Size of a window `width` pixels wide, after flooring.
    pub fn fit_width(&self, width: u32) -> Size {
        let width = width.max(self.min_width);
        Size::new(width, self.height_for(width))
    }

    /// Reshape an arbitrary size to the lock, keeping its width.
    pub fn fit(&self, size: Size) -> Size {
        self.fit_width(size.width)
    }

    fn height_for(&self, width: u32) -> u32 {
        round_to_pixels(f64::from(width) / self.ratio)
    }
}

/// Aspect ratio of media with the given intrinsic dimensions.
///
/// Returns `None` for zero-sized media, which the player treats as
/// unsupported.
pub fn ratio_of(width: u32, height: u32) -> Option<f64> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(f64::from(width) / f64::from(height))
}

pub(crate) fn round_to_pixels(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let rounded = value.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        DEFAULT_ASPECT_RATIO
    }
}
