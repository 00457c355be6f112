//! Floorplan Render Library
//!
//! Renderer abstraction and implementations for the floorplan editor.
//! Every frame is a full redraw; the default implementation uses Vello.

mod display_list;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use display_list::{DisplayList, DrawCommand};
pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError, draw_frame};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{VelloRenderer, VelloSurface};
