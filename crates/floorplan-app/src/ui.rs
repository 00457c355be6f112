//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, Stroke, Vec2};
use floorplan_core::objects::RoomId;
use floorplan_core::tools::ToolKind;
use floorplan_core::viewport::ZoomDirection;
use floorplan_render::GridStyle;

const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
const TEXT: Color32 = Color32::from_rgb(60, 60, 60);

/// Editable name of one room in the room list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEntry {
    pub id: RoomId,
    pub name: String,
}

/// UI state that persists across frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub current_tool: ToolKind,
    pub grid_style: GridStyle,
    /// Pixels per grid cell, for the zoom readout.
    pub grid_spacing: f64,
    /// Rooms in creation order with their edit buffers.
    pub rooms: Vec<RoomEntry>,
    pub shortcuts_modal_open: bool,
}

impl UiState {
    /// Bring the room list in line with the world, keeping edit buffers of
    /// rooms that still exist.
    pub fn sync_rooms<'a>(&mut self, rooms: impl IntoIterator<Item = (RoomId, &'a str)>) {
        let previous = std::mem::take(&mut self.rooms);
        self.rooms = rooms
            .into_iter()
            .map(|(id, name)| {
                previous
                    .iter()
                    .find(|entry| entry.id == id)
                    .cloned()
                    .unwrap_or_else(|| RoomEntry {
                        id,
                        name: name.to_string(),
                    })
            })
            .collect();
    }
}

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetTool(ToolKind),
    CycleGrid,
    Zoom(ZoomDirection),
    ResetView,
    RenameRoom(RoomId, String),
    ToggleShortcuts,
}

/// Frame shared by every floating panel.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Render all UI panels and return the first action triggered.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let bottom_action = render_bottom_toolbar(ctx, ui_state);
    let rooms_action = render_room_list(ctx, ui_state);

    if ui_state.shortcuts_modal_open {
        render_shortcuts_modal(ctx, ui_state);
    }

    toolbar_action.or(bottom_action).or(rooms_action)
}

/// Render the tool selector and return any triggered action.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_CENTER, Vec2::new(12.0, 0.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);

                    for (index, tool) in ToolKind::ALL.into_iter().enumerate() {
                        let is_selected = ui_state.current_tool == tool;
                        let response = ui
                            .selectable_label(is_selected, tool.name())
                            .on_hover_text(format!("{} ({})", tool.name(), index + 1));
                        if response.clicked() && !is_selected {
                            action = Some(UiAction::SetTool(tool));
                        }
                    }
                });
            });
        });

    action
}

/// Render the bottom-left toolbar with grid toggle and zoom controls.
fn render_bottom_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    #[allow(deprecated)]
    let screen_rect = ctx.input(|i| i.content_rect());
    let toolbar_height = 36.0;
    let margin = 12.0;
    let bottom_y = screen_rect.max.y - margin - toolbar_height;

    egui::Area::new(egui::Id::new("bottom_toolbar"))
        .fixed_pos(Pos2::new(margin, bottom_y.max(margin)))
        .interactable(true)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().inner_margin(Margin::symmetric(12, 6)).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);

                    if ui
                        .button(format!("Grid: {}", ui_state.grid_style.name()))
                        .on_hover_text("Cycle grid style (G)")
                        .clicked()
                    {
                        action = Some(UiAction::CycleGrid);
                    }

                    ui.label(egui::RichText::new("|").size(14.0).color(Color32::from_gray(200)));

                    if ui.button("\u{2212}").on_hover_text("Zoom out").clicked() {
                        action = Some(UiAction::Zoom(ZoomDirection::Out));
                    }
                    let readout = ui
                        .add(
                            egui::Label::new(
                                egui::RichText::new(format!("{:.0} px", ui_state.grid_spacing))
                                    .size(12.0)
                                    .color(TEXT),
                            )
                            .sense(egui::Sense::click()),
                        )
                        .on_hover_text("Reset view (Ctrl+0)");
                    if readout.clicked() {
                        action = Some(UiAction::ResetView);
                    }
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        action = Some(UiAction::Zoom(ZoomDirection::In));
                    }

                    ui.label(egui::RichText::new("|").size(14.0).color(Color32::from_gray(200)));

                    if ui.button("?").on_hover_text("Keyboard shortcuts").clicked() {
                        action = Some(UiAction::ToggleShortcuts);
                    }
                });
            });
        });

    action
}

/// Render the list of detected rooms with editable names.
fn render_room_list(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if ui_state.rooms.is_empty() {
        return None;
    }
    let mut action = None;

    egui::Area::new(egui::Id::new("room_list"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(200.0);
                ui.label(egui::RichText::new("Rooms").size(13.0).strong().color(TEXT));
                ui.add_space(4.0);
                for entry in &mut ui_state.rooms {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut entry.name)
                            .id(egui::Id::new(("room_name", entry.id.0)))
                            .desired_width(f32::INFINITY),
                    );
                    if response.changed() {
                        action = Some(UiAction::RenameRoom(entry.id, entry.name.clone()));
                    }
                }
            });
        });

    action
}

fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    use crate::shortcuts::ShortcutRegistry;

    // Backdrop
    egui::Area::new(egui::Id::new("shortcuts_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            #[allow(deprecated)]
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                ui_state.shortcuts_modal_open = false;
            }
        });

    egui::Area::new(egui::Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Keyboard Shortcuts").size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("\u{2715}").clicked() {
                            ui_state.shortcuts_modal_open = false;
                        }
                    });
                });
                ui.add_space(12.0);
                for shortcut in ShortcutRegistry::all() {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(shortcut.format())
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(Color32::from_rgb(100, 116, 139)),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(shortcut.description).size(12.0).color(TEXT));
                        });
                    });
                    ui.add_space(4.0);
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_rooms_adds_and_drops() {
        let mut state = UiState::default();
        state.sync_rooms([(RoomId(1), "unnamed room"), (RoomId(2), "unnamed room")]);
        assert_eq!(state.rooms.len(), 2);

        state.sync_rooms([(RoomId(2), "unnamed room")]);
        assert_eq!(state.rooms, vec![RoomEntry { id: RoomId(2), name: "unnamed room".into() }]);
    }

    #[test]
    fn test_sync_rooms_keeps_edit_buffer() {
        let mut state = UiState::default();
        state.sync_rooms([(RoomId(1), "unnamed room")]);
        state.rooms[0].name = "Kitch".into();

        state.sync_rooms([(RoomId(1), "unnamed room")]);
        assert_eq!(state.rooms[0].name, "Kitch");
    }

    #[test]
    fn test_render_ui_without_interaction() {
        let ctx = Context::default();
        let mut state = UiState {
            grid_spacing: 24.0,
            ..Default::default()
        };
        state.sync_rooms([(RoomId(1), "Kitchen")]);

        let mut action = Some(UiAction::CycleGrid);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &mut state);
        });
        assert_eq!(action, None);
    }
}
