//! Keyboard shortcut registry and documentation.

use floorplan_core::tools::ToolKind;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+0").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// What a key press asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SetTool(ToolKind),
    /// Delete every wall with an endpoint in the cell under the pointer.
    DeleteAtPointer,
    CycleGrid,
    ResetView,
    ToggleShortcuts,
}

/// Resolve a key name to its action. Character keys are case-insensitive.
pub fn action_for_key(key: &str, ctrl: bool) -> Option<ShortcutAction> {
    if ctrl {
        return match key {
            "0" => Some(ShortcutAction::ResetView),
            _ => None,
        };
    }
    let action = match key.to_ascii_lowercase().as_str() {
        "m" | "1" => ShortcutAction::SetTool(ToolKind::Move),
        "w" | "2" => ShortcutAction::SetTool(ToolKind::Wall),
        "r" | "3" => ShortcutAction::SetTool(ToolKind::Room),
        "d" | "4" => ShortcutAction::SetTool(ToolKind::Door),
        "n" | "5" => ShortcutAction::SetTool(ToolKind::Window),
        "g" => ShortcutAction::CycleGrid,
        "?" => ShortcutAction::ToggleShortcuts,
        "delete" | "backspace" => ShortcutAction::DeleteAtPointer,
        _ => return None,
    };
    Some(action)
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("M", false, false, "Move tool"),
            Shortcut::new("W", false, false, "Wall tool"),
            Shortcut::new("R", false, false, "Room tool"),
            Shortcut::new("D", false, false, "Door tool"),
            Shortcut::new("N", false, false, "Window tool"),
            Shortcut::new("1-5", false, false, "Select tool by position"),
            Shortcut::new("G", false, false, "Cycle grid style"),
            Shortcut::new("0", true, false, "Reset pan and zoom"),
            Shortcut::new("Delete", false, false, "Delete walls at pointer"),
            Shortcut::new("Backspace", false, false, "Delete walls at pointer"),
            Shortcut::new("?", false, false, "Show keyboard shortcuts"),
            Shortcut::new("Right-drag", false, false, "Pan the grid"),
            Shortcut::new("Wheel", false, false, "Zoom the grid"),
        ]
    }

    /// One line per shortcut, key column padded for alignment.
    pub fn lines() -> Vec<String> {
        Self::all()
            .iter()
            .map(|shortcut| format!("{:12} {}", shortcut.format(), shortcut.description))
            .collect()
    }

    /// Log all shortcuts at info level.
    pub fn log_all() {
        log::info!("Keyboard shortcuts:");
        for line in Self::lines() {
            log::info!("  {line}");
        }
    }
}
