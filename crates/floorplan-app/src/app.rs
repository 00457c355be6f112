//! Core application state and lifecycle.

use floorplan_core::input::{CursorIcon, PointerButton, WheelDelta};
use floorplan_core::EditorState;
use floorplan_render::{GridStyle, RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::shortcuts::{ShortcutAction, ShortcutRegistry, action_for_key};
use crate::ui::{UiAction, UiState, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Floorplan".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

/// Map a winit mouse button to the editor's button numbering.
fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Secondary),
        MouseButton::Right => Some(PointerButton::Tertiary),
        _ => None,
    }
}

fn window_cursor(cursor: CursorIcon) -> winit::window::CursorIcon {
    match cursor {
        CursorIcon::Default => winit::window::CursorIcon::Default,
        CursorIcon::Crosshair => winit::window::CursorIcon::Crosshair,
        CursorIcon::Grab => winit::window::CursorIcon::Grab,
        CursorIcon::Grabbing => winit::window::CursorIcon::Grabbing,
    }
}

/// Name a key the way the shortcut table spells it.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Character(c) => Some(c.as_str()),
        Key::Named(NamedKey::Delete) => Some("Delete"),
        Key::Named(NamedKey::Backspace) => Some("Backspace"),
        _ => None,
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    floorplan_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    editor: EditorState,
    modifiers: ModifiersState,
    cursor: CursorIcon,
    config: AppConfig,
}

impl AppState {
    /// Size of the window in logical pixels.
    fn logical_size(&self) -> Size {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor();
        Size::new(size.width as f64 / scale, size.height as f64 / scale)
    }

    fn apply_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetTool(tool) => self.editor.set_tool(tool),
            UiAction::CycleGrid => {
                self.ui_state.grid_style = self.ui_state.grid_style.next();
                log::info!("Grid style: {}", self.ui_state.grid_style.name());
            }
            UiAction::Zoom(direction) => {
                if self.editor.viewport.zoom(direction) {
                    self.editor.request_redraw();
                }
            }
            UiAction::ResetView => {
                self.editor.viewport.reset();
                self.editor.request_redraw();
            }
            UiAction::RenameRoom(id, name) => {
                if let Err(e) = self.editor.rename_room(id, name) {
                    log::warn!("Rename failed: {}", e);
                }
            }
            UiAction::ToggleShortcuts => {
                self.ui_state.shortcuts_modal_open = !self.ui_state.shortcuts_modal_open;
            }
        }
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SetTool(tool) => self.apply_ui_action(UiAction::SetTool(tool)),
            ShortcutAction::CycleGrid => self.apply_ui_action(UiAction::CycleGrid),
            ShortcutAction::ResetView => self.apply_ui_action(UiAction::ResetView),
            ShortcutAction::ToggleShortcuts => self.apply_ui_action(UiAction::ToggleShortcuts),
            ShortcutAction::DeleteAtPointer => {
                let cell = self.editor.current_cell();
                let removed = self.editor.delete_walls_at(cell);
                log::debug!("Deleted {} walls at {:?}", removed, cell);
            }
        }
    }

    /// Push editor-side changes out to the window.
    fn sync_window(&mut self) {
        let cursor = self.editor.cursor();
        if cursor != self.cursor {
            self.window.set_cursor(window_cursor(cursor));
            self.cursor = cursor;
        }
        if self.editor.take_redraw_request() {
            self.window.request_redraw();
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> RenderResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context missing".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("vello renderer: {e:?}")))?;

        // Vello renders to Rgba8Unorm; the surface format on WebGPU is typically Bgra8Unorm
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let ui_state = UiState {
            grid_style: self.config.grid_style,
            ..Default::default()
        };

        log::info!("Floorplan editor initialized - {}x{}", surface.config.width, surface.config.height);
        ShortcutRegistry::log_all();

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            floorplan_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            editor: EditorState::new(),
            modifiers: ModifiersState::empty(),
            cursor: CursorIcon::Default,
            config: self.config.clone(),
        };
        let size = state.logical_size();
        state.editor.resize(size);

        #[cfg(target_arch = "wasm32")]
        if state.editor.context_menu() {
            crate::web::suppress_context_menu(&window);
        }

        self.state = Some(state);
        self.pending_window = None;

        window.request_redraw();
        Ok(())
    }

    fn render(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };

        let rooms: Vec<_> = state
            .editor
            .world
            .rooms()
            .map(|room| (room.id(), room.name.clone()))
            .collect();
        state
            .ui_state
            .sync_rooms(rooms.iter().map(|(id, name)| (*id, name.as_str())));
        state.ui_state.current_tool = state.editor.tools.current_tool;
        state.ui_state.grid_spacing = state.editor.viewport.grid_spacing();

        // Run egui and get any actions
        let egui_input = state.egui_state.take_egui_input(&state.window);
        let mut ui_action = None;
        let egui_output = state.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, &mut state.ui_state);
        });
        if let Some(action) = ui_action {
            state.apply_ui_action(action);
        }

        let repaint = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        state.egui_state.handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state.egui_ctx.tessellate(egui_output.shapes, egui_output.pixels_per_point);

        // Build the floorplan scene
        let ctx = RenderContext::new(&state.editor, state.logical_size())
            .with_scale_factor(state.window.scale_factor())
            .with_background(state.config.background_color)
            .with_grid(state.ui_state.grid_style);
        state.floorplan_renderer.build_scene(&ctx);
        let scene = state.floorplan_renderer.take_scene();

        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}", RendererError::Surface(format!("{e:?}")));
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color: state.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need StorageBinding, which WebGPU only
        // supports for Rgba8Unorm; the result is blitted to the surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("{}", RendererError::RenderFailed(format!("{e:?}")));
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            state
                .texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            state.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });

            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        if repaint {
            state.window.request_redraw();
        }
        state.sync_window();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = crate::web::create_canvas(self.config.width, self.config.height)
                .expect("Failed to create canvas");

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Window created, initializing renderer...");

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // Transmute lifetime to 'static - App owns both window and surface
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            if let Err(e) = self.finish_init(window, surface) {
                log::error!("{e}");
                event_loop.exit();
            }
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let (width, height) =
                        crate::web::viewport_pixels(self.config.width, self.config.height);

                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");
                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                            .await
                        {
                            Ok(surface) => {
                                let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };

                                // SAFETY: WASM is single-threaded and the event loop keeps the App alive
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                if let Err(e) = app.finish_init(window_clone, surface) {
                                    log::error!("{e}");
                                    app.init_in_progress.set(false);
                                }
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                window.request_redraw();
            }
            return;
        }

        if matches!(event, WindowEvent::RedrawRequested) {
            self.render();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                let logical = state.logical_size();
                state.editor.resize(logical);
                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Drags that started on the canvas keep following the pointer
                let dragging = state.editor.input.is_button_pressed(PointerButton::Primary)
                    || state.editor.input.is_button_pressed(PointerButton::PAN);
                if egui_wants_input && !dragging {
                    return;
                }
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.editor.pointer_move(Point::new(logical.x, logical.y));
            }

            WindowEvent::MouseInput { state: btn_state, button, .. } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let position = state.editor.input.pointer_position;

                match btn_state {
                    ElementState::Pressed => {
                        if egui_wants_input {
                            return;
                        }
                        state.editor.pointer_down(position, button);
                    }
                    // Releases always reach the editor so drags never stick
                    ElementState::Released => {
                        state.editor.pointer_up(position, button);
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_input {
                    return;
                }
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => WheelDelta::Lines(y as f64),
                    MouseScrollDelta::PixelDelta(pos) => WheelDelta::Pixels(pos.y),
                };
                state.editor.wheel(delta);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed {
                    return;
                }
                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                if let Some(action) = key_name(&event.logical_key).and_then(|key| action_for_key(key, ctrl)) {
                    state.apply_shortcut(action);
                    state.window.request_redraw();
                }
            }

            _ => {}
        }

        state.sync_window();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_button_mapping() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Middle), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::PAN));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(&Key::Character("w".into())), Some("w"));
        assert_eq!(key_name(&Key::Named(NamedKey::Delete)), Some("Delete"));
        assert_eq!(key_name(&Key::Named(NamedKey::Escape)), None);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Floorplan");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.grid_style, GridStyle::Lines);
    }
}
