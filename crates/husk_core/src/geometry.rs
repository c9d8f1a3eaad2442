//! Rectangles in client coordinates

/// Axis-aligned rectangle in client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its origin and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle centred on a point with the given half extents
    ///
    /// Zero half extents produce a zero-area rectangle at the point.
    pub fn from_center(cx: f32, cy: f32, half_width: f32, half_height: f32) -> Self {
        Self {
            x: cx - half_width,
            y: cy - half_height,
            width: half_width * 2.0,
            height: half_height * 2.0,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if two rectangles overlap
    ///
    /// Rectangles that only touch along an edge or a corner overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.right() < other.left() || self.left() > other.right() {
            return false;
        }
        if self.bottom() < other.top() || self.top() > other.bottom() {
            return false;
        }
        true
    }
}
