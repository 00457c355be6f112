//! Drawing surface abstraction used by world objects.

use kurbo::{Point, Rect};
use peniko::Color;

/// A flat 2D target that world objects paint themselves onto.
///
/// Coordinates are screen pixels. Renderers implement this over their own
/// scene type; nothing here retains state between frames.
pub trait Surface {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline an axis-aligned rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// Fill a closed polygon. Fewer than three points draws nothing.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    /// Draw a straight line segment.
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
}
