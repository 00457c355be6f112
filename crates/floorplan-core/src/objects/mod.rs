//! World object definitions for the floorplan.

mod room;
mod wall;

pub use room::{DEFAULT_ROOM_NAME, Room};
pub use wall::{Endpoint, Wall};

use crate::input::{CursorIcon, PointerButton};
use crate::surface::Surface;
use crate::tools::ToolKind;
use crate::viewport::{Cell, Viewport};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a wall, unique among walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(pub u32);

/// Identifier of a room, unique among rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// Identifier of any entity in the world.
///
/// Walls and rooms draw ids from independent counters, so the kind is part of
/// the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    Wall(WallId),
    Room(RoomId),
}

impl From<WallId> for EntityId {
    fn from(id: WallId) -> Self {
        EntityId::Wall(id)
    }
}

impl From<RoomId> for EntityId {
    fn from(id: RoomId) -> Self {
        EntityId::Room(id)
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wall #{}", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room #{}", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Wall(id) => id.fmt(f),
            EntityId::Room(id) => id.fmt(f),
        }
    }
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors used when world objects draw themselves.
pub mod palette {
    use super::SerializableColor;

    pub const WALL: SerializableColor = SerializableColor::new(71, 85, 105, 255);
    pub const HANDLE: SerializableColor = SerializableColor::new(51, 65, 85, 255);
    pub const HANDLE_DRAGGING: SerializableColor = SerializableColor::new(59, 130, 246, 255);
    pub const ROOM_FILL: SerializableColor = SerializableColor::new(134, 239, 172, 90);
}

/// What the dispatcher hands to every object for a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerContext {
    /// Grid cell under the pointer.
    pub cell: Cell,
    /// Active tool.
    pub tool: ToolKind,
}

/// What an object did with a pointer release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Release {
    /// The release was not for this object.
    #[default]
    Ignored,
    /// A drag ended and the object geometry may have changed.
    Moved,
    /// A drag ended leaving the object degenerate; it must leave the world.
    Collapsed,
}

impl Release {
    /// Whether the object handled the release.
    pub fn consumed(self) -> bool {
        self != Release::Ignored
    }
}

/// Common behaviour for everything that lives in the world.
pub trait Drawable {
    /// Paint the object at its screen position.
    fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport);

    /// React to pointer movement. Returns a cursor affordance if the object wants one.
    fn on_pointer_move(&mut self, _ctx: &PointerContext) -> Option<CursorIcon> {
        None
    }

    /// React to a button press. Returns true if the press was consumed.
    fn on_pointer_down(&mut self, _ctx: &PointerContext, _button: PointerButton) -> bool {
        false
    }

    /// React to a button release.
    fn on_pointer_up(&mut self, _ctx: &PointerContext, _button: PointerButton) -> Release {
        Release::Ignored
    }
}

/// An entity in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Wall(Wall),
    Room(Room),
}

impl Entity {
    /// Get the entity id.
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Wall(wall) => EntityId::Wall(wall.id()),
            Entity::Room(room) => EntityId::Room(room.id()),
        }
    }

    /// Checked capability query for wall-only operations.
    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Entity::Wall(wall) => Some(wall),
            Entity::Room(_) => None,
        }
    }

    /// Mutable variant of [`Entity::as_wall`].
    pub fn as_wall_mut(&mut self) -> Option<&mut Wall> {
        match self {
            Entity::Wall(wall) => Some(wall),
            Entity::Room(_) => None,
        }
    }

    /// Checked capability query for room-only operations.
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Entity::Room(room) => Some(room),
            Entity::Wall(_) => None,
        }
    }

    /// Mutable variant of [`Entity::as_room`].
    pub fn as_room_mut(&mut self) -> Option<&mut Room> {
        match self {
            Entity::Room(room) => Some(room),
            Entity::Wall(_) => None,
        }
    }
}

impl Drawable for Entity {
    fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        match self {
            Entity::Wall(wall) => wall.draw(surface, viewport),
            Entity::Room(room) => room.draw(surface, viewport),
        }
    }

    fn on_pointer_move(&mut self, ctx: &PointerContext) -> Option<CursorIcon> {
        match self {
            Entity::Wall(wall) => wall.on_pointer_move(ctx),
            Entity::Room(room) => room.on_pointer_move(ctx),
        }
    }

    fn on_pointer_down(&mut self, ctx: &PointerContext, button: PointerButton) -> bool {
        match self {
            Entity::Wall(wall) => wall.on_pointer_down(ctx, button),
            Entity::Room(room) => room.on_pointer_down(ctx, button),
        }
    }

    fn on_pointer_up(&mut self, ctx: &PointerContext, button: PointerButton) -> Release {
        match self {
            Entity::Wall(wall) => wall.on_pointer_up(ctx, button),
            Entity::Room(room) => room.on_pointer_up(ctx, button),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_queries() {
        let wall = Entity::Wall(Wall::new(WallId(3), Cell::new(0, 0), Cell::new(2, 0)));
        let room = Entity::Room(Room::new(RoomId(3), Vec::new()));

        assert!(wall.as_wall().is_some());
        assert!(wall.as_room().is_none());
        assert!(room.as_room().is_some());
        assert!(room.as_wall().is_none());
        assert_ne!(wall.id(), room.id());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::from(WallId(7)).to_string(), "wall #7");
        assert_eq!(EntityId::from(RoomId(2)).to_string(), "room #2");
    }

    #[test]
    fn test_color_roundtrip() {
        let color: Color = palette::ROOM_FILL.into();
        assert_eq!(SerializableColor::from(color), palette::ROOM_FILL);
    }

    #[test]
    fn test_release_consumed() {
        assert!(!Release::Ignored.consumed());
        assert!(Release::Moved.consumed());
        assert!(Release::Collapsed.consumed());
    }
}
