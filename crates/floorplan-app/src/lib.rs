//! Floorplan editor application.
//!
//! The application shell providing windowing, input handling,
//! and integration of the editor core with the renderer.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry, action_for_key};
pub use ui::{RoomEntry, UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
