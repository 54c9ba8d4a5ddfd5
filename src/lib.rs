use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

pub mod camera;
pub mod config;
pub mod fields;
pub mod input;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod surface;
pub mod visibility;

use config::BackdropConfig;
use input::{InputPort, Viewport, WindowEvents};
use render::RenderPipeline;
use scene::Scene;
use surface::Surface;
use visibility::VisibilityGate;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Info).ok();
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything that lives between mount and unmount
struct Runtime {
    window: Window,
    scene: Scene,
    pipeline: RenderPipeline,
    gate: VisibilityGate,
    input: InputPort<WindowEvents>,
    surface: Surface,
    viewport: Viewport,
    start_ms: f64,
    suspend_when_hidden: bool,
    render_fault: FaultLatch,
}

impl Runtime {
    fn mount(window: Window, parent: &HtmlElement, config: &BackdropConfig) -> Result<Self, String> {
        let document = window.document().ok_or("No document on window")?;

        let mut input = InputPort::new(WindowEvents::new(window.clone()));
        input.start()?;
        let initial = input.snapshot();

        let seed = config.seed.unwrap_or_else(random_seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let scene = Scene::new(config, &mut rng)?;

        let gate = VisibilityGate::new(&config.visibility, initial.scroll_y, initial.viewport.height);
        let surface = Surface::attach(&document, parent, &gate)?;

        let (width, height) = surface.resize(initial.viewport, window.device_pixel_ratio());
        let pipeline = match surface.context().and_then(|gl| RenderPipeline::new(gl, width, height, &scene)) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                surface.detach();
                return Err(e);
            }
        };

        log::info!(
            "Backdrop mounted: {} cloud points, {} spiral points, {} shapes (seed {})",
            scene.sphere_cloud.count(),
            scene.spiral.count(),
            scene.swarm.count(),
            seed
        );

        Ok(Self {
            start_ms: now_ms(&window),
            window,
            scene,
            pipeline,
            gate,
            input,
            surface,
            viewport: initial.viewport,
            suspend_when_hidden: config.visibility.suspend_when_hidden,
            render_fault: FaultLatch::default(),
        })
    }

    fn frame(&mut self) {
        let input = self.input.snapshot();

        if input.viewport != self.viewport {
            self.apply_viewport(input.viewport);
        }

        if self.gate.update(input.scroll_y, input.viewport.height) {
            self.surface.set_opacity(self.gate.opacity());
            log::debug!("Backdrop visibility: {:?}", self.gate.state());
        }

        if self.suspend_when_hidden && !self.gate.state().is_visible() {
            return;
        }

        let time = elapsed_seconds(self.start_ms, now_ms(&self.window));
        self.scene.tick(time, &input);

        match self.render_fault.observe(self.pipeline.render(&self.scene)) {
            FaultChange::Started(e) => log::warn!("Skipping frames until rendering recovers: {}", e),
            FaultChange::Cleared => log::info!("Rendering recovered"),
            FaultChange::None => {}
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        let (width, height) = self.surface.resize(viewport, self.window.device_pixel_ratio());
        self.pipeline.resize(width, height);
        self.viewport = viewport;
        log::info!("Backdrop resized to {}x{} device pixels", width, height);
    }

    fn shutdown(mut self) {
        self.input.stop();
        self.pipeline.dispose();
        self.surface.detach();
        log::info!("Backdrop unmounted");
    }
}

/// Edge of a repeating per-frame failure
#[derive(Debug, PartialEq)]
enum FaultChange {
    None,
    Started(String),
    Cleared,
}

/// Turns a per-frame result stream into start/clear edges so a lasting fault logs once
#[derive(Debug, Default)]
struct FaultLatch {
    failing: bool,
}

impl FaultLatch {
    fn observe(&mut self, result: Result<(), String>) -> FaultChange {
        match (result, self.failing) {
            (Err(e), false) => {
                self.failing = true;
                FaultChange::Started(e)
            }
            (Ok(()), true) => {
                self.failing = false;
                FaultChange::Cleared
            }
            _ => FaultChange::None,
        }
    }
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Seconds between two `performance.now()` readings, never negative
pub fn elapsed_seconds(start_ms: f64, now_ms: f64) -> f32 {
    let elapsed = (now_ms - start_ms) / 1000.0;
    if elapsed.is_finite() {
        elapsed.max(0.0) as f32
    } else {
        0.0
    }
}

/// The mounted backdrop, exposed to JavaScript
#[wasm_bindgen]
pub struct InteractiveBackdrop {
    runtime: Rc<RefCell<Option<Runtime>>>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
}

#[wasm_bindgen]
impl InteractiveBackdrop {
    /// Attach the overlay to `parent` and start the frame loop.
    /// `config_yaml` overrides the defaults; empty or missing means defaults.
    pub fn mount(parent: HtmlElement, config_yaml: Option<String>) -> Result<InteractiveBackdrop, JsValue> {
        let config = BackdropConfig::from_yaml(config_yaml.as_deref().unwrap_or(""))
            .map_err(|e| JsValue::from_str(&e))?;

        let window = web_sys::window().ok_or("No global window")?;
        let runtime = Runtime::mount(window.clone(), &parent, &config)
            .map_err(|e| JsValue::from_str(&e))?;

        let backdrop = InteractiveBackdrop {
            runtime: Rc::new(RefCell::new(Some(runtime))),
            frame: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
        };
        backdrop.start_loop(&window).map_err(|e| JsValue::from_str(&e))?;

        Ok(backdrop)
    }

    /// Stop the loop, remove every listener and the overlay. Safe to call twice.
    pub fn unmount(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Some(id) = self.frame_id.take() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("Failed to cancel animation frame: {:?}", e);
                }
            }
        }

        // Breaks the closure's reference to itself
        self.frame.borrow_mut().take();

        if let Some(runtime) = self.runtime.borrow_mut().take() {
            runtime.shutdown();
        }
    }

    /// Re-measure the window, e.g. after a device pixel ratio change
    pub fn resize(&self) {
        if let Some(rt) = self.runtime.borrow_mut().as_mut() {
            let viewport = input::dom::window_viewport(&rt.window);
            rt.apply_viewport(viewport);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.runtime.borrow().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.runtime
            .borrow()
            .as_ref()
            .map(|rt| rt.gate.state().is_visible())
            .unwrap_or(false)
    }
}

impl InteractiveBackdrop {
    fn start_loop(&self, window: &Window) -> Result<(), String> {
        let runtime = Rc::clone(&self.runtime);
        let frame = Rc::clone(&self.frame);
        let frame_id = Rc::clone(&self.frame_id);

        *self.frame.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            frame_id.set(None);

            match runtime.borrow_mut().as_mut() {
                Some(rt) => rt.frame(),
                None => return,
            }

            let Some(window) = web_sys::window() else {
                return;
            };
            match request_frame(&window, &frame) {
                Ok(id) => frame_id.set(Some(id)),
                Err(e) => log::error!("Frame loop stopped: {}", e),
            }
        }));

        let id = request_frame(window, &self.frame)?;
        self.frame_id.set(Some(id));
        Ok(())
    }
}

fn request_frame(window: &Window, frame: &FrameCallback) -> Result<i32, String> {
    let callback = frame.borrow();
    let closure = callback.as_ref().ok_or("Frame loop is not running")?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(|e| format!("requestAnimationFrame failed: {:?}", e))
}

impl Drop for InteractiveBackdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fault_reported_once() {
        let mut latch = FaultLatch::default();
        assert_eq!(latch.observe(Ok(())), FaultChange::None);

        let lost = || Err("WebGL context lost".to_string());
        assert_eq!(latch.observe(lost()), FaultChange::Started("WebGL context lost".to_string()));
        for _ in 0..60 {
            assert_eq!(latch.observe(lost()), FaultChange::None);
        }

        assert_eq!(latch.observe(Ok(())), FaultChange::Cleared);
        assert_eq!(latch.observe(Ok(())), FaultChange::None);
        assert!(matches!(latch.observe(lost()), FaultChange::Started(_)));
    }

    #[test]
    fn test_elapsed_seconds() {
        assert_eq!(elapsed_seconds(1000.0, 3500.0), 2.5);
        assert_eq!(elapsed_seconds(1000.0, 500.0), 0.0);
        assert_eq!(elapsed_seconds(0.0, f64::NAN), 0.0);
    }
}
