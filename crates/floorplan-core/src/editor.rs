//! Editor state and pointer event dispatch.

use crate::error::FloorplanResult;
use crate::input::{CursorIcon, InputState, PointerButton, PointerEvent, WheelDelta};
use crate::objects::{Drawable, Entity, EntityId, PointerContext, Release, RoomId, Wall, WallId};
use crate::rooms;
use crate::tools::{ToolKind, ToolManager};
use crate::viewport::{Cell, Viewport, ZoomDirection};
use crate::world::World;
use kurbo::{Point, Size};

/// Everything the floorplan editor knows, in one place.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// Pan and zoom.
    pub viewport: Viewport,
    /// Pointer position and held buttons.
    pub input: InputState,
    /// Active tool.
    pub tools: ToolManager,
    /// Walls and rooms.
    pub world: World,
    /// Canvas size in pixels.
    pub viewport_size: Size,
    cell: Cell,
    cursor: CursorIcon,
    redraw_requested: bool,
}

impl EditorState {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a pointer event. Returns true if a world object consumed it.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                false
            }
            PointerEvent::Wheel { delta, .. } => {
                self.wheel(delta);
                false
            }
        }
    }

    /// Pointer moved: pan if the pan button is held, then let every object react.
    pub fn pointer_move(&mut self, position: Point) {
        let delta = self.input.move_pointer(position);
        if self.input.is_button_pressed(PointerButton::PAN) {
            self.viewport.pan(delta);
        }
        self.cell = self.viewport.resolve(position);

        let ctx = self.pointer_context();
        let mut cursor = CursorIcon::Default;
        for id in self.world.ids_ordered() {
            if let Some(entity) = self.world.get_mut(id) {
                if let Some(icon) = entity.on_pointer_move(&ctx) {
                    cursor = cursor.max(icon);
                }
            }
        }
        if cursor == CursorIcon::Default && self.tools.current_tool.has_default_action() {
            cursor = CursorIcon::Crosshair;
        }
        self.cursor = cursor;
        self.request_redraw();
    }

    /// Button pressed. Objects get the press in draw order until one consumes
    /// it; an unconsumed primary press runs the active tool.
    pub fn pointer_down(&mut self, position: Point, button: PointerButton) -> bool {
        self.input.press(button);
        self.input.move_pointer(position);
        self.cell = self.viewport.resolve(position);

        let ctx = self.pointer_context();
        let mut consumed = false;
        for id in self.world.ids_ordered() {
            if let Some(entity) = self.world.get_mut(id) {
                if entity.on_pointer_down(&ctx, button) {
                    log::debug!("Pointer down consumed by {id}");
                    consumed = true;
                    break;
                }
            }
        }

        if !consumed && button == PointerButton::Primary {
            self.run_tool_action(self.cell);
        }
        self.request_redraw();
        consumed
    }

    /// Button released. Every object sees the release; walls whose drag ended
    /// are then removed if degenerate, or re-checked for rooms.
    pub fn pointer_up(&mut self, position: Point, button: PointerButton) -> bool {
        self.input.release(button);
        self.cell = self.viewport.resolve(position);

        let ctx = self.pointer_context();
        let mut released = Vec::new();
        for id in self.world.ids_ordered() {
            if let Some(entity) = self.world.get_mut(id) {
                let outcome = entity.on_pointer_up(&ctx, button);
                if outcome.consumed() {
                    released.push((id, outcome));
                }
            }
        }

        for &(id, outcome) in &released {
            if let (EntityId::Wall(wall), Release::Collapsed) = (id, outcome) {
                log::debug!("Removing collapsed {wall}");
                if let Err(err) = self.world.remove_wall(wall) {
                    log::warn!("Failed to remove collapsed wall: {err}");
                }
            }
        }
        for &(id, outcome) in &released {
            if let (EntityId::Wall(wall), Release::Moved) = (id, outcome) {
                rooms::wall_changed(&mut self.world, wall);
            }
        }

        self.request_redraw();
        !released.is_empty()
    }

    /// Wheel turned: one zoom step per event, direction only.
    pub fn wheel(&mut self, delta: WheelDelta) -> bool {
        let direction = match delta.direction() {
            1 => ZoomDirection::In,
            -1 => ZoomDirection::Out,
            _ => return false,
        };
        if !self.viewport.zoom(direction) {
            return false;
        }
        self.cell = self.viewport.resolve(self.input.pointer_position);
        log::debug!("Grid spacing now {}", self.viewport.grid_spacing());
        self.request_redraw();
        true
    }

    /// Canvas resized.
    pub fn resize(&mut self, size: Size) {
        self.viewport_size = size;
        self.request_redraw();
    }

    /// Whether the platform context menu should be suppressed over the canvas.
    pub fn context_menu(&self) -> bool {
        true
    }

    /// Select a tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.set_tool(tool) {
            self.request_redraw();
        }
    }

    /// Delete one wall through the room destruction path.
    pub fn delete_wall(&mut self, id: WallId) -> FloorplanResult<()> {
        self.world.remove_wall(id)?;
        log::info!("Deleted {id}");
        self.request_redraw();
        Ok(())
    }

    /// Delete every wall with an endpoint on `cell`. Returns how many went.
    pub fn delete_walls_at(&mut self, cell: Cell) -> usize {
        let mut deleted = 0;
        for id in self.world.walls_at(cell) {
            if self.delete_wall(id).is_ok() {
                deleted += 1;
            }
        }
        deleted
    }

    /// Change a room label.
    pub fn rename_room(&mut self, id: RoomId, name: impl Into<String>) -> FloorplanResult<()> {
        self.world.rename_room(id, name)?;
        self.request_redraw();
        Ok(())
    }

    /// Cursor the objects asked for on the last move.
    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    /// Grid cell under the pointer.
    pub fn current_cell(&self) -> Cell {
        self.cell
    }

    /// Ask the shell to repaint on its next opportunity.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn pointer_context(&self) -> PointerContext {
        PointerContext {
            cell: self.cell,
            tool: self.tools.current_tool,
        }
    }

    /// The only place walls are created.
    fn run_tool_action(&mut self, cell: Cell) {
        match self.tools.current_tool {
            ToolKind::Move => {}
            ToolKind::Wall => {
                let id = self.world.allocate_wall_id();
                let wall = Wall::new(id, cell, cell).with_moving_b(true, true);
                self.world.insert(Entity::Wall(wall));
                log::debug!("Started {id} at {cell:?}");
            }
            ToolKind::Room => {
                // Clockwise from the top edge; the corner opposite `cell`
                // follows the pointer.
                let edges = [
                    ((false, false), (true, false)),
                    ((true, false), (true, true)),
                    ((true, true), (false, true)),
                    ((false, true), (false, false)),
                ];
                for ((ax, ay), (bx, by)) in edges {
                    let id = self.world.allocate_wall_id();
                    let wall = Wall::new(id, cell, cell)
                        .with_moving_a(ax, ay)
                        .with_moving_b(bx, by);
                    self.world.insert(Entity::Wall(wall));
                }
                log::debug!("Started room outline at {cell:?}");
            }
            ToolKind::Door | ToolKind::Window => {
                log::info!("{} tool is not implemented", self.tools.current_tool.name());
            }
        }
    }
}
