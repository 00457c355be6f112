//! Wall entity.

use super::{Drawable, PointerContext, Release, RoomId, WallId, palette};
use crate::input::{CursorIcon, PointerButton};
use crate::surface::Surface;
use crate::tools::ToolKind;
use crate::viewport::{Cell, Viewport};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One end of a wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub col: i32,
    pub row: i32,
    /// Column follows the pointer while set.
    #[serde(skip)]
    pub moving_x: bool,
    /// Row follows the pointer while set.
    #[serde(skip)]
    pub moving_y: bool,
}

impl Endpoint {
    /// A resting endpoint on a cell.
    pub fn at(cell: Cell) -> Self {
        Self {
            col: cell.col,
            row: cell.row,
            moving_x: false,
            moving_y: false,
        }
    }

    /// Cell this endpoint sits on.
    pub fn cell(&self) -> Cell {
        Cell::new(self.col, self.row)
    }

    /// Whether the endpoint is following the pointer on any axis.
    pub fn is_moving(&self) -> bool {
        self.moving_x || self.moving_y
    }

    fn follow(&mut self, cell: Cell) -> bool {
        if self.moving_x {
            self.col = cell.col;
        }
        if self.moving_y {
            self.row = cell.row;
        }
        self.is_moving()
    }

    fn stop(&mut self) {
        self.moving_x = false;
        self.moving_y = false;
    }
}

/// A straight wall between two grid cells.
///
/// Walls are the edges of the room graph: two walls are connected when they
/// share an endpoint cell. Mid-segment crossings do not connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub(crate) id: WallId,
    pub a: Endpoint,
    pub b: Endpoint,
    /// Rooms this wall borders.
    #[serde(default)]
    pub(crate) rooms: BTreeSet<RoomId>,
}

impl Wall {
    /// Create a resting wall between two cells.
    pub fn new(id: WallId, a: Cell, b: Cell) -> Self {
        Self {
            id,
            a: Endpoint::at(a),
            b: Endpoint::at(b),
            rooms: BTreeSet::new(),
        }
    }

    /// Make endpoint A follow the pointer on the given axes.
    pub fn with_moving_a(mut self, x: bool, y: bool) -> Self {
        self.a.moving_x = x;
        self.a.moving_y = y;
        self
    }

    /// Make endpoint B follow the pointer on the given axes.
    pub fn with_moving_b(mut self, x: bool, y: bool) -> Self {
        self.b.moving_x = x;
        self.b.moving_y = y;
        self
    }

    pub fn id(&self) -> WallId {
        self.id
    }

    /// Zero-length walls must not outlive the interaction that made them.
    pub fn is_degenerate(&self) -> bool {
        self.a.cell() == self.b.cell()
    }

    /// Whether either endpoint is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.a.is_moving() || self.b.is_moving()
    }

    /// Whether one of the endpoints sits on `cell`.
    pub fn touches(&self, cell: Cell) -> bool {
        self.a.cell() == cell || self.b.cell() == cell
    }

    /// The endpoint opposite to `cell`, if `cell` is one of the endpoints.
    pub fn far_end(&self, cell: Cell) -> Option<Cell> {
        if self.a.cell() == cell {
            Some(self.b.cell())
        } else if self.b.cell() == cell {
            Some(self.a.cell())
        } else {
            None
        }
    }

    /// Rooms this wall currently borders.
    pub fn rooms(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.iter().copied()
    }

    /// Whether this wall borders the given room.
    pub fn borders(&self, room: RoomId) -> bool {
        self.rooms.contains(&room)
    }

    /// Whether this wall borders any of the given rooms.
    pub fn borders_any(&self, rooms: &BTreeSet<RoomId>) -> bool {
        !self.rooms.is_disjoint(rooms)
    }

    pub(crate) fn join_room(&mut self, room: RoomId) {
        self.rooms.insert(room);
    }

    pub(crate) fn leave_room(&mut self, room: RoomId) -> bool {
        self.rooms.remove(&room)
    }

    /// Corners of the pipe between the two endpoint centres.
    ///
    /// The offset pair depends on the quadrant of A relative to B so the
    /// stroke stays one cell wide along the diagonal.
    pub fn outline(&self, viewport: &Viewport) -> [Point; 4] {
        let half = viewport.grid_spacing() / 2.0;
        let start = viewport.cell_center(self.a.cell());
        let end = viewport.cell_center(self.b.cell());
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        let (near, far) = if (dx >= 0.0) == (dy >= 0.0) {
            (Vec2::new(half, -half), Vec2::new(-half, half))
        } else {
            (Vec2::new(-half, -half), Vec2::new(half, half))
        };

        [start + near, end + near, end + far, start + far]
    }
}

impl Drawable for Wall {
    fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        surface.fill_polygon(&self.outline(viewport), palette::WALL.into());

        for end in [&self.a, &self.b] {
            let color = if end.is_moving() {
                palette::HANDLE_DRAGGING
            } else {
                palette::HANDLE
            };
            surface.fill_rect(viewport.cell_rect(end.cell()), color.into());
        }
    }

    fn on_pointer_move(&mut self, ctx: &PointerContext) -> Option<CursorIcon> {
        let dragging_a = self.a.follow(ctx.cell);
        let dragging_b = self.b.follow(ctx.cell);
        if dragging_a || dragging_b {
            Some(CursorIcon::Grabbing)
        } else if ctx.tool == ToolKind::Move && self.touches(ctx.cell) {
            Some(CursorIcon::Grab)
        } else {
            None
        }
    }

    fn on_pointer_down(&mut self, ctx: &PointerContext, button: PointerButton) -> bool {
        if ctx.tool != ToolKind::Move || button != PointerButton::Primary {
            return false;
        }

        let end = if self.a.cell() == ctx.cell {
            &mut self.a
        } else if self.b.cell() == ctx.cell {
            &mut self.b
        } else {
            return false;
        };
        end.moving_x = true;
        end.moving_y = true;
        log::debug!("Dragging endpoint of {} at {:?}", self.id, ctx.cell);
        true
    }

    fn on_pointer_up(&mut self, _ctx: &PointerContext, button: PointerButton) -> Release {
        if button != PointerButton::Primary || !self.is_dragging() {
            return Release::Ignored;
        }

        self.a.stop();
        self.b.stop();
        if self.is_degenerate() {
            Release::Collapsed
        } else {
            Release::Moved
        }
    }
}
