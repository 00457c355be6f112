//! Viewport module for grid pan/zoom transforms.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Pixels per grid cell at startup.
pub const DEFAULT_GRID_SPACING: f64 = 24.0;
/// Smallest allowed grid spacing (most zoomed out).
pub const MIN_GRID_SPACING: f64 = 10.0;
/// Largest allowed grid spacing (most zoomed in).
pub const MAX_GRID_SPACING: f64 = 32.0;

/// A cell on the grid, addressed in absolute grid units.
///
/// Wall endpoints live on cells, so two walls meet exactly when their
/// endpoints resolve to the same cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Viewport manages the mapping between screen pixels and grid cells.
///
/// The offset is the world-space pixel position of the top-left screen
/// corner. It is continuous; only cell resolution snaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current pan offset in pixels.
    pub offset: Vec2,
    /// Pixels per grid cell.
    grid_spacing: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            grid_spacing: DEFAULT_GRID_SPACING,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current grid spacing in pixels.
    pub fn grid_spacing(&self) -> f64 {
        self.grid_spacing
    }

    /// Resolve a screen position into the grid cell under it.
    pub fn resolve(&self, screen: Point) -> Cell {
        Cell {
            col: ((screen.x + self.offset.x) / self.grid_spacing).floor() as i32,
            row: ((screen.y + self.offset.y) / self.grid_spacing).floor() as i32,
        }
    }

    /// Screen position of the top-left corner of a cell.
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(
            f64::from(cell.col) * self.grid_spacing - self.offset.x,
            f64::from(cell.row) * self.grid_spacing - self.offset.y,
        )
    }

    /// Screen position of the centre of a cell.
    pub fn cell_center(&self, cell: Cell) -> Point {
        let half = self.grid_spacing / 2.0;
        self.cell_origin(cell) + Vec2::new(half, half)
    }

    /// Screen rectangle covered by a cell.
    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let origin = self.cell_origin(cell);
        Rect::new(
            origin.x,
            origin.y,
            origin.x + self.grid_spacing,
            origin.y + self.grid_spacing,
        )
    }

    /// Apply a pointer drag delta in screen pixels.
    ///
    /// The content follows the pointer, so the offset moves against the delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset -= delta;
    }

    /// Step the grid spacing by one pixel. Returns true if it changed.
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let step = match direction {
            ZoomDirection::In => 1.0,
            ZoomDirection::Out => -1.0,
        };
        let new_spacing = (self.grid_spacing + step).clamp(MIN_GRID_SPACING, MAX_GRID_SPACING);
        if (new_spacing - self.grid_spacing).abs() < f64::EPSILON {
            return false;
        }
        self.grid_spacing = new_spacing;
        true
    }

    /// Reset viewport to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.grid_spacing = DEFAULT_GRID_SPACING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.grid_spacing() - DEFAULT_GRID_SPACING).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_identity() {
        let viewport = Viewport::new();
        assert_eq!(viewport.resolve(Point::new(0.0, 0.0)), Cell::new(0, 0));
        assert_eq!(viewport.resolve(Point::new(23.9, 47.9)), Cell::new(0, 1));
        assert_eq!(viewport.resolve(Point::new(24.0, 48.0)), Cell::new(1, 2));
    }

    #[test]
    fn test_resolve_negative_floors() {
        let viewport = Viewport::new();
        assert_eq!(viewport.resolve(Point::new(-1.0, -25.0)), Cell::new(-1, -2));
    }

    #[test]
    fn test_resolve_with_offset() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(48.0, -24.0);
        assert_eq!(viewport.resolve(Point::new(10.0, 10.0)), Cell::new(2, -1));
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(13.5, -7.25);
        let cell = Cell::new(-3, 5);
        assert_eq!(viewport.resolve(viewport.cell_center(cell)), cell);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.offset.x + 10.0).abs() < f64::EPSILON);
        assert!((viewport.offset.y + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        for _ in 0..100 {
            viewport.zoom(ZoomDirection::In);
        }
        assert!((viewport.grid_spacing() - MAX_GRID_SPACING).abs() < f64::EPSILON);
        assert!(!viewport.zoom(ZoomDirection::In));

        for _ in 0..100 {
            viewport.zoom(ZoomDirection::Out);
        }
        assert!((viewport.grid_spacing() - MIN_GRID_SPACING).abs() < f64::EPSILON);
        assert!(!viewport.zoom(ZoomDirection::Out));
    }

    #[test]
    fn test_resolve_monotonic_in_spacing() {
        let mut viewport = Viewport::new();
        while viewport.zoom(ZoomDirection::Out) {}

        let points = [
            Point::new(0.0, 0.0),
            Point::new(31.0, 5.0),
            Point::new(250.0, 999.0),
            Point::new(1024.5, 640.25),
        ];
        for point in points {
            let mut previous = viewport.resolve(point);
            while viewport.zoom(ZoomDirection::In) {
                let current = viewport.resolve(point);
                assert!(current.col <= previous.col);
                assert!(current.row <= previous.row);
                previous = current;
            }
            while viewport.zoom(ZoomDirection::Out) {}
        }
    }
}
