//! Geometry value types for popup layout and hit testing.
//!
//! These mirror the small slice of geometry a headless widget needs: the
//! combobox lays out its popup, hit-tests pointer positions into parts, and
//! reports bounds to the accessibility tree. There is no rendering here.

/// A point in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A two-dimensional size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent of the rectangle.
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from position and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// The rectangle's width.
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// The rectangle's height.
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// The x coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// The y coordinate of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Check whether a point lies within the rectangle.
    ///
    /// The top and left edges are inclusive, the bottom and right edges
    /// exclusive.
    pub fn contains(&self, pos: Point) -> bool {
        pos.x >= self.origin.x && pos.x < self.right() && pos.y >= self.origin.y && pos.y < self.bottom()
    }
}
