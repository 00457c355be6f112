//! Room entity.

use super::{Drawable, RoomId, palette};
use crate::surface::Surface;
use crate::viewport::{Cell, Viewport};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Label given to rooms until the user renames them.
pub const DEFAULT_ROOM_NAME: &str = "unnamed room";

/// A room enclosed by a cycle of walls.
///
/// Rooms are derived: the room-graph engine creates and destroys them as the
/// wall graph changes. The outline is only used for drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub(crate) id: RoomId,
    pub name: String,
    #[serde(default)]
    pub(crate) outline: Vec<Cell>,
}

impl Room {
    /// Create a room with the default name.
    pub fn new(id: RoomId, outline: Vec<Cell>) -> Self {
        Self {
            id,
            name: DEFAULT_ROOM_NAME.to_string(),
            outline,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Cycle vertices in traversal order.
    pub fn outline(&self) -> &[Cell] {
        &self.outline
    }

    pub(crate) fn set_outline(&mut self, outline: Vec<Cell>) {
        self.outline = outline;
    }
}

impl Drawable for Room {
    fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        if self.outline.len() < 3 {
            return;
        }
        let points: Vec<Point> = self
            .outline
            .iter()
            .map(|&cell| viewport.cell_center(cell))
            .collect();
        surface.fill_polygon(&points, palette::ROOM_FILL.into());
    }
}
