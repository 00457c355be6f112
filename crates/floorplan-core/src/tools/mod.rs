//! Tool system for the floorplan editor.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Drag wall endpoints.
    #[default]
    Move,
    /// Draw a single wall.
    Wall,
    /// Draw a rectangle of four walls.
    Room,
    /// Place a door (not implemented yet).
    Door,
    /// Place a window (not implemented yet).
    Window,
}

impl ToolKind {
    /// All tools in toolbar order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Move,
        ToolKind::Wall,
        ToolKind::Room,
        ToolKind::Door,
        ToolKind::Window,
    ];

    /// Display name for toolbars and logs.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Move => "Move",
            ToolKind::Wall => "Wall",
            ToolKind::Room => "Room",
            ToolKind::Door => "Door",
            ToolKind::Window => "Window",
        }
    }

    /// Whether pressing on empty canvas does something with this tool.
    pub fn has_default_action(self) -> bool {
        matches!(self, ToolKind::Wall | ToolKind::Room)
    }
}

/// Holds the active tool.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
}

impl ToolManager {
    /// Create a new tool manager with the move tool selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Returns true if the selection changed.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.current_tool == tool {
            return false;
        }
        log::debug!("Tool changed: {} -> {}", self.current_tool.name(), tool.name());
        self.current_tool = tool;
        true
    }

    /// Check whether the given tool is the active one (for toolbar highlight).
    pub fn is_active(&self, tool: ToolKind) -> bool {
        self.current_tool == tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_move() {
        let tools = ToolManager::new();
        assert_eq!(tools.current_tool, ToolKind::Move);
        assert!(tools.is_active(ToolKind::Move));
    }

    #[test]
    fn test_exactly_one_active() {
        let mut tools = ToolManager::new();
        assert!(tools.set_tool(ToolKind::Room));
        let active: Vec<_> = ToolKind::ALL.iter().filter(|&&t| tools.is_active(t)).collect();
        assert_eq!(active, vec![&ToolKind::Room]);
        assert!(!tools.set_tool(ToolKind::Room));
    }

    #[test]
    fn test_door_and_window_have_no_action() {
        assert!(!ToolKind::Door.has_default_action());
        assert!(!ToolKind::Window.has_default_action());
        assert!(!ToolKind::Move.has_default_action());
        assert!(ToolKind::Wall.has_default_action());
        assert!(ToolKind::Room.has_default_action());
    }
}
