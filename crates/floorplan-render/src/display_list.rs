//! A recording surface for headless rendering.

use crate::renderer::{RenderContext, Renderer, draw_frame};
use floorplan_core::surface::Surface;
use kurbo::{Point, Rect};
use peniko::Color;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f64 },
    FillPolygon { points: Vec<Point>, color: Color },
    StrokeLine { from: Point, to: Point, color: Color, width: f64 },
}

/// Records every call made on it, in order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded polygon fills.
    pub fn polygons(&self) -> impl Iterator<Item = &[Point]> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillPolygon { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    /// Recorded line strokes.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::StrokeLine { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeLine { from, to, color, width });
    }
}

impl Renderer for DisplayList {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.clear();
        draw_frame(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::EditorState;
    use kurbo::Size;

    #[test]
    fn test_degenerate_polygon_skipped() {
        let mut list = DisplayList::new();
        list.fill_polygon(&[Point::ZERO, Point::new(1.0, 1.0)], Color::BLACK);
        assert!(list.is_empty());
    }

    #[test]
    fn test_build_scene_replaces_previous_frame() {
        let editor = EditorState::new();
        let ctx = RenderContext::new(&editor, Size::new(100.0, 100.0));
        let mut list = DisplayList::new();

        list.build_scene(&ctx);
        let first = list.len();
        list.build_scene(&ctx);
        assert_eq!(list.len(), first);
        assert_eq!(list.background_color(&ctx), ctx.background_color);
    }
}
