//! Renderer trait abstraction and the backend-agnostic frame.

use floorplan_core::EditorState;
use floorplan_core::objects::Drawable;
use floorplan_core::surface::Surface;
use kurbo::{Point, Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only corner crosses (+).
    CrossPlus,
    /// Only corner dots (.).
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::CrossPlus,
            GridStyle::CrossPlus => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::CrossPlus => "Crosses",
            GridStyle::Dots => "Dots",
        }
    }
}

const BORDER_WIDTH: f64 = 2.0;
const GRID_LINE_WIDTH: f64 = 0.5;
const CROSS_ARM: f64 = 3.0;
const DOT_RADIUS: f64 = 1.5;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a EditorState,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Grid line color.
    pub grid_color: Color,
    /// Canvas border color.
    pub border_color: Color,
    /// Fill of the row and column under the pointer.
    pub highlight_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a EditorState, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            grid_color: Color::from_rgba8(200, 200, 200, 160),
            border_color: Color::from_rgba8(100, 116, 139, 255),
            highlight_color: Color::from_rgba8(59, 130, 246, 28),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Canvas rectangle in logical pixels.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.viewport_size)
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello or record the frame for inspection.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Screen positions of grid lines along one axis, covering `[0, extent]`.
fn grid_positions(offset: f64, spacing: f64, extent: f64) -> impl Iterator<Item = f64> {
    let first = (offset / spacing).floor();
    (0_i32..)
        .map(move |i| (first + f64::from(i)) * spacing - offset)
        .take_while(move |&position| position <= extent)
}

/// Paint one full frame: background, border, pointer row and column, grid,
/// then every entity in draw order.
pub fn draw_frame(surface: &mut dyn Surface, ctx: &RenderContext) {
    let editor = ctx.editor;
    let viewport = &editor.viewport;
    let bounds = ctx.bounds();

    surface.fill_rect(bounds, ctx.background_color);
    surface.stroke_rect(bounds, ctx.border_color, BORDER_WIDTH);

    let cell = viewport.cell_rect(editor.current_cell());
    surface.fill_rect(
        Rect::new(cell.x0, bounds.y0, cell.x1, bounds.y1),
        ctx.highlight_color,
    );
    surface.fill_rect(
        Rect::new(bounds.x0, cell.y0, bounds.x1, cell.y1),
        ctx.highlight_color,
    );

    let spacing = viewport.grid_spacing();
    let columns = || grid_positions(viewport.offset.x, spacing, bounds.x1);
    let rows = || grid_positions(viewport.offset.y, spacing, bounds.y1);
    match ctx.grid_style {
        GridStyle::None => {}
        GridStyle::Lines => {
            for x in columns() {
                surface.stroke_line(Point::new(x, bounds.y0), Point::new(x, bounds.y1), ctx.grid_color, GRID_LINE_WIDTH);
            }
            for y in rows() {
                surface.stroke_line(Point::new(bounds.x0, y), Point::new(bounds.x1, y), ctx.grid_color, GRID_LINE_WIDTH);
            }
        }
        GridStyle::CrossPlus => {
            for x in columns() {
                for y in rows() {
                    surface.stroke_line(Point::new(x - CROSS_ARM, y), Point::new(x + CROSS_ARM, y), ctx.grid_color, 1.0);
                    surface.stroke_line(Point::new(x, y - CROSS_ARM), Point::new(x, y + CROSS_ARM), ctx.grid_color, 1.0);
                }
            }
        }
        GridStyle::Dots => {
            for x in columns() {
                for y in rows() {
                    let dot = Rect::new(x - DOT_RADIUS, y - DOT_RADIUS, x + DOT_RADIUS, y + DOT_RADIUS);
                    surface.fill_rect(dot, ctx.grid_color);
                }
            }
        }
    }

    for entity in editor.world.entities_ordered() {
        entity.draw(surface, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::{DisplayList, DrawCommand};
    use floorplan_core::input::PointerButton;
    use floorplan_core::tools::ToolKind;
    use floorplan_core::viewport::Cell;

    fn square_room() -> EditorState {
        let mut editor = EditorState::new();
        editor.set_tool(ToolKind::Wall);
        for (from, to) in [((0, 0), (4, 0)), ((4, 0), (4, 4)), ((4, 4), (0, 4)), ((0, 4), (0, 0))] {
            let start = editor.viewport.cell_center(Cell::new(from.0, from.1));
            let end = editor.viewport.cell_center(Cell::new(to.0, to.1));
            editor.pointer_move(start);
            editor.pointer_down(start, PointerButton::Primary);
            editor.pointer_move(end);
            editor.pointer_up(end, PointerButton::Primary);
        }
        editor
    }

    #[test]
    fn test_init_error_propagates() {
        fn init(ready: bool) -> RenderResult<()> {
            if !ready {
                return Err(RendererError::InitFailed("render context missing".into()));
            }
            Ok(())
        }
        assert!(init(true).is_ok());
        let err = init(false).unwrap_err();
        assert!(matches!(err, RendererError::InitFailed(_)));
        assert_eq!(err.to_string(), "Initialization failed: render context missing");
    }

    #[test]
    fn test_grid_style_cycle() {
        let mut style = GridStyle::default();
        assert_eq!(style, GridStyle::Lines);
        for _ in 0..4 {
            style = style.next();
        }
        assert_eq!(style, GridStyle::Lines);
        assert_eq!(GridStyle::CrossPlus.name(), "Crosses");
    }

    #[test]
    fn test_grid_positions_cover_extent() {
        let positions: Vec<f64> = grid_positions(0.0, 24.0, 100.0).collect();
        assert_eq!(positions, vec![0.0, 24.0, 48.0, 72.0, 96.0]);

        let shifted: Vec<f64> = grid_positions(30.0, 24.0, 50.0).collect();
        assert_eq!(shifted, vec![-6.0, 18.0, 42.0]);
    }

    #[test]
    fn test_frame_order() {
        let editor = EditorState::new();
        let ctx = RenderContext::new(&editor, Size::new(240.0, 120.0));
        let mut list = DisplayList::new();
        draw_frame(&mut list, &ctx);

        let commands = list.commands();
        assert!(matches!(commands[0], DrawCommand::FillRect { rect, .. } if rect == ctx.bounds()));
        assert!(matches!(commands[1], DrawCommand::StrokeRect { .. }));
        assert!(matches!(commands[2], DrawCommand::FillRect { .. }));
        assert!(matches!(commands[3], DrawCommand::FillRect { .. }));
        // 11 columns (0..=240) and 6 rows (0..=120) at 24px spacing.
        assert_eq!(list.lines().count(), 17);
    }

    #[test]
    fn test_no_grid() {
        let editor = EditorState::new();
        let ctx = RenderContext::new(&editor, Size::new(240.0, 120.0)).with_grid(GridStyle::None);
        let mut list = DisplayList::new();
        draw_frame(&mut list, &ctx);
        assert_eq!(list.lines().count(), 0);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_entities_drawn_after_grid() {
        let editor = square_room();
        let ctx = RenderContext::new(&editor, Size::new(240.0, 240.0));
        let mut list = DisplayList::new();
        draw_frame(&mut list, &ctx);

        // Four wall pipes plus the room fill.
        assert_eq!(list.polygons().count(), 5);
        let last_line = list
            .commands()
            .iter()
            .rposition(|command| matches!(command, DrawCommand::StrokeLine { .. }))
            .unwrap();
        let first_polygon = list
            .commands()
            .iter()
            .position(|command| matches!(command, DrawCommand::FillPolygon { .. }))
            .unwrap();
        assert!(last_line < first_polygon);
    }

    #[test]
    fn test_highlight_follows_pointer_cell() {
        let mut editor = EditorState::new();
        editor.pointer_move(Point::new(50.0, 75.0));
        let ctx = RenderContext::new(&editor, Size::new(240.0, 240.0)).with_grid(GridStyle::None);
        let mut list = DisplayList::new();
        draw_frame(&mut list, &ctx);

        let DrawCommand::FillRect { rect: column, .. } = list.commands()[2] else {
            panic!("expected column highlight");
        };
        assert!((column.x0 - 48.0).abs() < f64::EPSILON);
        assert!((column.x1 - 72.0).abs() < f64::EPSILON);
        let DrawCommand::FillRect { rect: row, .. } = list.commands()[3] else {
            panic!("expected row highlight");
        };
        assert!((row.y0 - 72.0).abs() < f64::EPSILON);
        assert!((row.y1 - 96.0).abs() < f64::EPSILON);
    }
}
