#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are layout points with the origin at the top-left of the form
//! surface and `y` growing downward.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::id::ChainDirection;

/// Horizontal inset of the jump arc's anchor from a left-to-right field's right edge.
pub const JUMP_RIGHT_INSET: f32 = 15.0;

/// Width trimmed from the right end of the bottom border.
pub const BORDER_RIGHT_TRIM: f32 = 10.0;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A rectangle for field frames and overlay bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    #[must_use]
    pub fn min_x(&self) -> f32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    #[must_use]
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Bottom border strip for a field with these bounds, in field-local space.
    ///
    /// The strip starts `line_width` above the bottom edge and stops short of the
    /// right edge by [`BORDER_RIGHT_TRIM`].
    #[must_use]
    pub fn border_frame(&self, line_width: f32) -> Rect {
        Rect::new(
            0.0,
            self.height - line_width,
            (self.width - BORDER_RIGHT_TRIM).max(0.0),
            self.height,
        )
    }
}

/// Circular arc drawn on the overlay surface between a completed field and its successor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpArc {
    pub center: Point,
    pub radius: f32,
    /// Start angle in radians, measured from +x toward +y.
    pub start_angle: f32,
    /// End angle in radians.
    pub end_angle: f32,
    pub clockwise: bool,
}

impl JumpArc {
    /// Arc hopping from the bottom edge of `from` down to the bottom edge of `to`.
    ///
    /// The diameter spans the vertical gap between the two bottom edges. A
    /// left-to-right chain hops off the right end of the field, a right-to-left
    /// chain off the left end.
    #[must_use]
    pub fn between(from: Rect, to: Rect, direction: ChainDirection) -> Self {
        let signed = (to.max_y() - from.max_y()) / 2.0;
        #[cfg(feature = "tracing")]
        if signed < 0.0 {
            tracing::trace!(
                radius = signed,
                "successor sits above its predecessor; mirroring jump radius"
            );
        }
        let radius = signed.abs();
        match direction {
            ChainDirection::LeftToRight => Self {
                center: Point::new(from.max_x() - JUMP_RIGHT_INSET, from.max_y() + radius),
                radius,
                start_angle: 3.1 * FRAC_PI_2,
                end_angle: FRAC_PI_2,
                clockwise: true,
            },
            ChainDirection::RightToLeft => Self {
                center: Point::new(from.min_x(), from.max_y() + radius),
                radius,
                start_angle: 3.0 * FRAC_PI_2,
                end_angle: FRAC_PI_2,
                clockwise: false,
            },
        }
    }

    /// Signed angular sweep in radians; positive is clockwise in screen space.
    #[must_use]
    pub fn sweep(&self) -> f32 {
        let tau = 2.0 * PI;
        if self.clockwise {
            (self.end_angle - self.start_angle).rem_euclid(tau)
        } else {
            -(self.start_angle - self.end_angle).rem_euclid(tau)
        }
    }

    /// Point along the arc at progress `t` in [0, 1].
    #[must_use]
    pub fn point_at(&self, t: f32) -> Point {
        let angle = self.start_angle + self.sweep() * t.clamp(0.0, 1.0);
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.sweep().abs() * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 30.0);
        assert!(close(r.max_x(), 110.0));
        assert!(close(r.max_y(), 50.0));
        assert!(close(r.mid_x(), 60.0));
        assert!(close(r.mid_y(), 35.0));
        assert!(!r.is_empty());
        assert!(Rect::from_size(0.0, 5.0).is_empty());
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn border_frame_sits_on_bottom_edge() {
        let field = Rect::new(40.0, 100.0, 200.0, 30.0);
        let border = field.border_frame(2.0);
        assert!(close(border.x, 0.0));
        assert!(close(border.y, 28.0));
        assert!(close(border.width, 190.0));
    }

    #[test]
    fn left_to_right_arc_hangs_off_right_edge() {
        let from = Rect::new(20.0, 100.0, 200.0, 30.0);
        let to = Rect::new(20.0, 160.0, 200.0, 30.0);
        let arc = JumpArc::between(from, to, ChainDirection::LeftToRight);
        assert!(close(arc.radius, 30.0));
        assert!(close(arc.center.x, 205.0));
        assert!(close(arc.center.y, 160.0));
        assert!(arc.clockwise);
    }

    #[test]
    fn right_to_left_arc_hangs_off_left_edge() {
        let from = Rect::new(20.0, 100.0, 200.0, 30.0);
        let to = Rect::new(20.0, 160.0, 200.0, 30.0);
        let arc = JumpArc::between(from, to, ChainDirection::RightToLeft);
        assert!(close(arc.center.x, 20.0));
        assert!(!arc.clockwise);
        assert!(arc.sweep() < 0.0);
        // Counter-clockwise half turn from the top of the circle to the bottom.
        assert!(close(arc.sweep(), -PI));
        let start = arc.point_at(0.0);
        let end = arc.point_at(1.0);
        assert!(close(start.y, 130.0));
        assert!(close(end.y, 190.0));
    }

    #[test]
    fn successor_above_mirrors_radius() {
        let from = Rect::new(0.0, 200.0, 100.0, 20.0);
        let to = Rect::new(0.0, 100.0, 100.0, 20.0);
        let arc = JumpArc::between(from, to, ChainDirection::LeftToRight);
        assert!(arc.radius >= 0.0);
        assert!(close(arc.radius, 50.0));
    }

    #[test]
    fn length_matches_sweep() {
        let from = Rect::new(0.0, 0.0, 100.0, 20.0);
        let to = Rect::new(0.0, 40.0, 100.0, 20.0);
        let arc = JumpArc::between(from, to, ChainDirection::RightToLeft);
        assert!(close(arc.length(), PI * arc.radius));
    }
}
