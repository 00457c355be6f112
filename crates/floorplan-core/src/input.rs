//! Input state management for pointer and wheel events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer button identifiers, numbered the way the canvas reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Button code 1.
    Primary,
    /// Button code 2.
    Secondary,
    /// Button code 3. Held to pan the viewport.
    Tertiary,
}

impl PointerButton {
    /// The button that pans the viewport while held.
    pub const PAN: PointerButton = PointerButton::Tertiary;

    /// Map a raw button code (1, 2 or 3) to a button.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(PointerButton::Primary),
            2 => Some(PointerButton::Secondary),
            3 => Some(PointerButton::Tertiary),
            _ => None,
        }
    }

    /// Raw button code.
    pub fn code(self) -> u16 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Secondary => 2,
            PointerButton::Tertiary => 3,
        }
    }
}

/// Wheel delta as reported by the different input sources.
///
/// Sources disagree on sign, so every variant documents which way is "up"
/// (away from the user) and [`WheelDelta::direction`] normalises them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WheelDelta {
    /// Legacy wheel delta, positive when scrolling up.
    WheelDelta(f64),
    /// Line-based detail, positive when scrolling down.
    Detail(f64),
    /// Native line delta, positive when scrolling up.
    Lines(f64),
    /// Native pixel delta, positive when scrolling up.
    Pixels(f64),
}

impl WheelDelta {
    /// Normalised direction: +1 for up, -1 for down, 0 for no movement.
    pub fn direction(self) -> i8 {
        let up = match self {
            WheelDelta::WheelDelta(d) | WheelDelta::Lines(d) | WheelDelta::Pixels(d) => d,
            WheelDelta::Detail(d) => -d,
        };
        if up > 0.0 {
            1
        } else if up < 0.0 {
            -1
        } else {
            0
        }
    }
}

/// Pointer event type for unified mouse handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
    },
    Up {
        position: Point,
        button: PointerButton,
    },
    Move {
        position: Point,
    },
    Wheel {
        position: Point,
        delta: WheelDelta,
    },
}

/// Cursor affordance requested by the world objects.
///
/// Ordered by precedence: when several objects ask for a cursor on the same
/// move, the greatest one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CursorIcon {
    #[default]
    Default,
    /// Drawing tool armed.
    Crosshair,
    /// Hovering a handle that can be dragged.
    Grab,
    /// A handle is being dragged.
    Grabbing,
}

/// Tracks pointer position and button states across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Previous pointer position for delta calculations.
    pub previous_pointer_position: Point,
    primary: bool,
    secondary: bool,
    tertiary: bool,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pointer position and return the delta from the last one.
    pub fn move_pointer(&mut self, position: Point) -> Vec2 {
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = position;
        self.pointer_delta()
    }

    /// Mark a button as held.
    pub fn press(&mut self, button: PointerButton) {
        *self.slot(button) = true;
    }

    /// Mark a button as released.
    pub fn release(&mut self, button: PointerButton) {
        *self.slot(button) = false;
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Secondary => self.secondary,
            PointerButton::Tertiary => self.tertiary,
        }
    }

    /// Get the pointer movement delta since the last move.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    fn slot(&mut self, button: PointerButton) -> &mut bool {
        match button {
            PointerButton::Primary => &mut self.primary,
            PointerButton::Secondary => &mut self.secondary,
            PointerButton::Tertiary => &mut self.tertiary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_codes() {
        assert_eq!(PointerButton::from_code(1), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_code(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_code(3), Some(PointerButton::Tertiary));
        assert_eq!(PointerButton::from_code(0), None);
        assert_eq!(PointerButton::from_code(4), None);
        assert_eq!(PointerButton::PAN.code(), 3);
    }

    #[test]
    fn test_button_press_release() {
        let mut input = InputState::new();
        input.press(PointerButton::Primary);
        assert!(input.is_button_pressed(PointerButton::Primary));
        assert!(!input.is_button_pressed(PointerButton::Tertiary));

        input.press(PointerButton::Tertiary);
        input.release(PointerButton::Primary);
        assert!(!input.is_button_pressed(PointerButton::Primary));
        assert!(input.is_button_pressed(PointerButton::Tertiary));
    }

    #[test]
    fn test_pointer_delta() {
        let mut input = InputState::new();
        input.move_pointer(Point::new(100.0, 100.0));
        let delta = input.move_pointer(Point::new(150.0, 120.0));
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_direction_normalised() {
        assert_eq!(WheelDelta::WheelDelta(120.0).direction(), 1);
        assert_eq!(WheelDelta::WheelDelta(-120.0).direction(), -1);
        assert_eq!(WheelDelta::Detail(-3.0).direction(), 1);
        assert_eq!(WheelDelta::Detail(3.0).direction(), -1);
        assert_eq!(WheelDelta::Lines(1.0).direction(), 1);
        assert_eq!(WheelDelta::Pixels(-4.5).direction(), -1);
        assert_eq!(WheelDelta::Pixels(0.0).direction(), 0);
    }
}
