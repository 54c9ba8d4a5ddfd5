//! The fixed, full-viewport overlay the backdrop draws into

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext};

use crate::input::Viewport;
use crate::visibility::VisibilityGate;

const CANVAS_STYLE: &str = "position: absolute; inset: 0; width: 100%; height: 100%; display: block;";

const GRADIENT_STYLE: &str = "position: absolute; inset: 0; pointer-events: none; \
     background: linear-gradient(to bottom, rgba(0,0,0,0.3), transparent, rgba(0,0,0,0.3));";

/// Clamp the device pixel ratio into [1, 2]
pub fn clamp_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(1.0, 2.0)
    } else {
        1.0
    }
}

/// Drawing buffer size in device pixels for a CSS viewport
pub fn drawing_buffer_size(viewport: Viewport, dpr: f64) -> (u32, u32) {
    let ratio = clamp_pixel_ratio(dpr);
    let width = (viewport.width as f64 * ratio).round() as u32;
    let height = (viewport.height as f64 * ratio).round() as u32;
    (width, height)
}

/// Wrapper div, canvas and gradient layer
pub struct Surface {
    wrapper: HtmlElement,
    canvas: HtmlCanvasElement,
}

impl Surface {
    /// Build the overlay and append it to `parent`
    pub fn attach(document: &Document, parent: &HtmlElement, gate: &VisibilityGate) -> Result<Self, String> {
        let wrapper = create_html(document, "div")?;
        set_style(&wrapper, &gate.overlay_style())?;

        let canvas = document
            .create_element("canvas")
            .map_err(|e| format!("Failed to create canvas: {:?}", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Created element is not a canvas".to_string())?;
        set_style(&canvas, CANVAS_STYLE)?;

        let gradient = create_html(document, "div")?;
        set_style(&gradient, GRADIENT_STYLE)?;

        append(&wrapper, &canvas)?;
        append(&wrapper, &gradient)?;
        append(parent, &wrapper)?;

        Ok(Self { wrapper, canvas })
    }

    /// Transparent, antialiased WebGL2 context on the overlay canvas
    pub fn context(&self) -> Result<WebGl2RenderingContext, String> {
        let options = js_sys::Object::new();
        for (key, value) in [
            ("alpha", JsValue::TRUE),
            ("antialias", JsValue::TRUE),
            ("premultipliedAlpha", JsValue::FALSE),
            ("powerPreference", JsValue::from_str("high-performance")),
        ] {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &value)
                .map_err(|e| format!("Failed to set context option '{}': {:?}", key, e))?;
        }

        self.canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(|e| format!("Failed to get WebGL2 context: {:?}", e))?
            .ok_or("WebGL2 is not available")?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| "Context is not WebGL2".to_string())
    }

    /// Size the drawing buffer to the viewport; returns the new size in device pixels
    pub fn resize(&self, viewport: Viewport, dpr: f64) -> (i32, i32) {
        let (width, height) = drawing_buffer_size(viewport, dpr);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        (width as i32, height as i32)
    }

    pub fn set_opacity(&self, opacity: f32) {
        if let Err(e) = self.wrapper.style().set_property("opacity", &opacity.to_string()) {
            log::warn!("Failed to set overlay opacity: {:?}", e);
        }
    }

    pub fn detach(&self) {
        self.wrapper.remove();
    }
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, String> {
    document
        .create_element(tag)
        .map_err(|e| format!("Failed to create <{}>: {:?}", tag, e))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("<{}> is not an HTML element", tag))
}

fn set_style(element: &web_sys::Element, css: &str) -> Result<(), String> {
    element
        .set_attribute("style", css)
        .map_err(|e| format!("Failed to set style: {:?}", e))
}

fn append(parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| format!("Failed to append overlay element: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_clamped() {
        assert_eq!(clamp_pixel_ratio(0.5), 1.0);
        assert_eq!(clamp_pixel_ratio(1.5), 1.5);
        assert_eq!(clamp_pixel_ratio(3.0), 2.0);
        assert_eq!(clamp_pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_drawing_buffer_size() {
        let viewport = Viewport::new(1280.0, 720.0);
        assert_eq!(drawing_buffer_size(viewport, 3.0), (2560, 1440));
        assert_eq!(drawing_buffer_size(viewport, 1.0), (1280, 720));
        assert_eq!(drawing_buffer_size(Viewport::new(0.0, 0.0), 2.0), (0, 0));
    }

    #[test]
    fn test_gradient_is_click_through() {
        assert!(GRADIENT_STYLE.contains("pointer-events: none"));
        assert!(GRADIENT_STYLE.contains("rgba(0,0,0,0.3)"));
    }
}
