//! Region of interest selection.
//!
//! A region is chosen with a single drag gesture on the first preview and is
//! used once to crop the working frame.

/// A pixel position. Display positions may lie outside the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if a point lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && i64::from(point.x) < i64::from(self.width)
            && i64::from(point.y) < i64::from(self.height)
    }
}

/// A rectangle given by its minimum corner and size.
///
/// Valid only when both width and height are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Create a normalized region from two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    /// Check if the region has a non-zero area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Scale a display-space region into source space and clamp it to the source.
    ///
    /// Returns None when nothing of the region survives clamping.
    pub fn to_source(&self, scale: f64, source: Dimensions) -> Option<Region> {
        let low_x = (f64::from(self.x) * scale).max(0.0);
        let low_y = (f64::from(self.y) * scale).max(0.0);
        let high_x = ((f64::from(self.x) + f64::from(self.width)) * scale)
            .min(f64::from(source.width));
        let high_y = ((f64::from(self.y) + f64::from(self.height)) * scale)
            .min(f64::from(source.height));

        let x = low_x as i32;
        let y = low_y as i32;
        let width = (high_x as i64 - i64::from(x)).max(0) as u32;
        let height = (high_y as i64 - i64::from(y)).max(0) as u32;

        let region = Region {
            x,
            y,
            width,
            height,
        };
        region.is_valid().then_some(region)
    }
}

/// State of the drag gesture.
#[derive(Debug, Clone, Copy, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        current: Point,
    },
    Finished(Region),
}

/// Tracks a press/drag/release gesture and produces a normalized region.
#[derive(Debug, Clone, Default)]
pub struct RegionSelector {
    state: DragState,
}

impl RegionSelector {
    /// Create a selector with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the press corner, discarding any earlier selection.
    pub fn on_pointer_down(&mut self, pos: Point) {
        self.state = DragState::Dragging {
            start: pos,
            current: pos,
        };
    }

    /// Move the opposite corner while the button is held.
    pub fn on_pointer_drag(&mut self, pos: Point) {
        if let DragState::Dragging { current, .. } = &mut self.state {
            *current = pos;
        }
    }

    /// Finish the gesture at `pos`. Corners are normalized so min <= max.
    pub fn on_pointer_up(&mut self, pos: Point) {
        if let DragState::Dragging { start, .. } = self.state {
            let region = Region::from_corners(start, pos);
            log::debug!(
                "Region gesture finished at ({}, {}) {}x{}",
                region.x,
                region.y,
                region.width,
                region.height
            );
            self.state = DragState::Finished(region);
        }
    }

    /// Whether a drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Rectangle to draw as feedback: the in-progress drag or the finished selection.
    pub fn preview(&self) -> Option<Region> {
        let region = match self.state {
            DragState::Idle => return None,
            DragState::Dragging { start, current } => Region::from_corners(start, current),
            DragState::Finished(region) => region,
        };
        region.is_valid().then_some(region)
    }

    /// The finished selection. A degenerate rectangle means "no selection".
    pub fn region(&self) -> Option<Region> {
        match self.state {
            DragState::Finished(region) if region.is_valid() => Some(region),
            _ => None,
        }
    }
}
