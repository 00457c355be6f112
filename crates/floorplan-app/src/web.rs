//! WebAssembly entry point and platform-specific code.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use winit::window::Window;

const CANVAS_ID: &str = "floorplan-canvas";

/// Browser viewport size in CSS pixels, falling back to the given size.
fn viewport_size(fallback_width: u32, fallback_height: u32) -> (f64, f64) {
    let Some(web_window) = web_sys::window() else {
        return (fallback_width as f64, fallback_height as f64);
    };
    let width = web_window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_width as f64);
    let height = web_window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_height as f64);
    (width, height)
}

/// Browser viewport size in device pixels.
pub fn viewport_pixels(fallback_width: u32, fallback_height: u32) -> (u32, u32) {
    let (width, height) = viewport_size(fallback_width, fallback_height);
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    ((width * dpr) as u32, (height * dpr) as u32)
}

/// Find or create the editor canvas and size it to fill the viewport.
pub fn create_canvas(fallback_width: u32, fallback_height: u32) -> Option<web_sys::HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;

    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .or_else(|| {
            let app_div = document.get_element_by_id("app")?;
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id(CANVAS_ID);
            app_div.append_child(&canvas).ok()?;
            canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
        })?;

    let (physical_width, physical_height) = viewport_pixels(fallback_width, fallback_height);
    canvas.set_width(physical_width);
    canvas.set_height(physical_height);
    let style = canvas.style();
    for (property, value) in [
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
    ] {
        let _ = style.set_property(property, value);
    }

    log::info!("Canvas created: {}x{} physical", physical_width, physical_height);
    Some(canvas)
}

/// Keep the browser menu from opening on right-click; the right button pans.
pub fn suppress_context_menu(window: &Window) {
    use winit::platform::web::WindowExtWebSys;

    let Some(canvas) = window.canvas() else {
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
        event.prevent_default();
    });
    if let Err(e) = canvas.add_event_listener_with_callback("contextmenu", handler.as_ref().unchecked_ref()) {
        log::warn!("Failed to install context menu handler: {:?}", e);
    }
    handler.forget();
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting floorplan editor (WASM)");

    crate::App::run().await;
}
