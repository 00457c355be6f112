//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, draw_frame};
use floorplan_core::surface::Surface;
use kurbo::{Affine, BezPath, Line, Point, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Paints onto a Vello scene, scaling logical pixels to physical ones.
pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
    transform: Affine,
}

impl<'a> VelloSurface<'a> {
    pub fn new(scene: &'a mut Scene, scale_factor: f64) -> Self {
        Self {
            scene,
            transform: Affine::scale(scale_factor),
        }
    }
}

impl Surface for VelloSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, color, None, &rect);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), self.transform, color, None, &rect);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path.close_path();
        self.scene.fill(Fill::NonZero, self.transform, color, None, &path);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), self.transform, color, None, &Line::new(from, to));
    }
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self { scene: Scene::new() }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let mut surface = VelloSurface::new(&mut self.scene, ctx.scale_factor);
        draw_frame(&mut surface, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::EditorState;
    use kurbo::Size;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene() {
        let mut renderer = VelloRenderer::new();
        let editor = EditorState::new();
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0)).with_scale_factor(2.0);

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());

        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }
}
