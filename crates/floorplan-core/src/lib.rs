//! Floorplan Core Library
//!
//! Platform-agnostic editor state for the floorplan editor: viewport, walls
//! and rooms, room detection and pointer dispatch.

pub mod editor;
pub mod error;
pub mod household;
pub mod input;
pub mod objects;
pub mod rooms;
pub mod surface;
pub mod tools;
pub mod viewport;
pub mod world;

pub use editor::EditorState;
pub use error::{FloorplanError, FloorplanResult};
pub use household::{HouseholdClient, HouseholdError, HouseholdTransport, SearchDebouncer, SearchOutcome};
pub use input::{CursorIcon, InputState, PointerButton, PointerEvent, WheelDelta};
pub use objects::{Drawable, Entity, EntityId, Room, RoomId, SerializableColor, Wall, WallId};
pub use surface::Surface;
pub use tools::{ToolKind, ToolManager};
pub use viewport::{Cell, Viewport, ZoomDirection};
pub use world::World;
