//! Geometry value types and the logical/screen coordinate mapping.
//!
//! Logical (document) space has its origin at the canvas center, y pointing
//! up, unscaled, on an integer grid. Screen space has its origin at the
//! viewport's top-left corner, y pointing down, continuous. A
//! [`CanvasTransform`] scales logical space around the viewport center and
//! then pans it.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A continuous point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl AddAssign<Offset> for Point {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D displacement. Gesture translations are screen-oriented (y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl AddAssign for Offset {
    fn add_assign(&mut self, rhs: Offset) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl Mul<f64> for Offset {
    type Output = Offset;

    fn mul(self, rhs: f64) -> Offset {
        Offset::new(self.dx * rhs, self.dy * rhs)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

/// Integer position of a placed emoji in logical space, relative to the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0, y: 0 };

    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of the visible canvas area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The screen point logical `(0, 0)` maps to before panning.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Persisted canvas pan/zoom.
///
/// `pan` is in screen pixels and is applied after scaling. `zoom` is a scale
/// factor (1.0 = no zoom) and is kept strictly positive by its callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub zoom: f64,
    pub pan: Offset,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Offset::ZERO }
    }
}

impl CanvasTransform {
    #[must_use]
    pub fn new(zoom: f64, pan: Offset) -> Self {
        Self { zoom, pan }
    }

    /// Map a logical position to screen space.
    #[must_use]
    pub fn to_screen(&self, logical: Position, viewport_center: Point) -> Point {
        to_screen(logical, self, viewport_center)
    }

    /// Map a screen point to the nearest logical grid position.
    #[must_use]
    pub fn to_logical(&self, screen: Point, viewport_center: Point) -> Position {
        to_logical(screen, self, viewport_center)
    }
}

/// Map a logical position to screen space under `transform`.
///
/// Logical y is flipped (y-up to y-down), the result is scaled by zoom around
/// the viewport center and then panned.
#[must_use]
pub fn to_screen(logical: Position, transform: &CanvasTransform, viewport_center: Point) -> Point {
    Point::new(
        viewport_center.x + transform.pan.dx + f64::from(logical.x) * transform.zoom,
        viewport_center.y + transform.pan.dy - f64::from(logical.y) * transform.zoom,
    )
}

/// Map a screen point to logical space under `transform`, rounded to the
/// nearest integer grid position.
#[must_use]
pub fn to_logical(screen: Point, transform: &CanvasTransform, viewport_center: Point) -> Position {
    let x = (screen.x - viewport_center.x - transform.pan.dx) / transform.zoom;
    let y = -(screen.y - viewport_center.y - transform.pan.dy) / transform.zoom;
    Position::new(round_to_grid(x), round_to_grid(y))
}

/// Round a logical coordinate to the integer grid, saturating at the `i32` range.
#[allow(clippy::cast_possible_truncation)]
fn round_to_grid(v: f64) -> i32 {
    // `as` saturates on overflow and maps NaN to 0.
    v.round() as i32
}
