//! Browser tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use interactive_backdrop::config::VisibilityConfig;
use interactive_backdrop::input::{dom, InputPort, WindowEvents};
use interactive_backdrop::surface::Surface;
use interactive_backdrop::visibility::VisibilityGate;
use interactive_backdrop::InteractiveBackdrop;
use wasm_bindgen_test::*;
use web_sys::{Event, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> web_sys::Window {
    web_sys::window().expect("no window")
}

fn pointer_move(window: &web_sys::Window, client_x: i32, client_y: i32) {
    let init = MouseEventInit::new();
    init.set_client_x(client_x);
    init.set_client_y(client_y);
    let event = MouseEvent::new_with_mouse_event_init_dict("pointermove", &init).unwrap();
    window.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn port_registers_three_listeners() {
    let mut port = InputPort::new(WindowEvents::new(window()));
    port.start().unwrap();
    assert!(port.is_listening());
    assert_eq!(port.source().listener_count(), 3);

    // Second start does not double-subscribe
    port.start().unwrap();
    assert_eq!(port.source().listener_count(), 3);

    port.stop();
    assert!(!port.is_listening());
    assert_eq!(port.source().listener_count(), 0);
}

#[wasm_bindgen_test]
fn resize_event_updates_snapshot() {
    let window = window();
    let mut port = InputPort::new(WindowEvents::new(window.clone()));
    port.start().unwrap();

    window.dispatch_event(&Event::new("resize").unwrap()).unwrap();
    assert_eq!(port.snapshot().viewport, dom::window_viewport(&window));
}

#[wasm_bindgen_test]
fn stopped_port_ignores_pointer() {
    let window = window();
    let viewport = dom::window_viewport(&window);
    assert!(viewport.width > 20.0 && viewport.height > 20.0);

    let mut port = InputPort::new(WindowEvents::new(window.clone()));
    port.start().unwrap();

    // Near the top-left corner while listening
    pointer_move(&window, 2, 2);
    let listening = port.snapshot();
    assert!(listening.pointer_x < -0.5, "pointer_x {}", listening.pointer_x);
    assert!(listening.pointer_y > 0.5, "pointer_y {}", listening.pointer_y);

    port.stop();

    // Bottom-right after stop must not reach the port
    pointer_move(&window, viewport.width as i32 - 2, viewport.height as i32 - 2);
    let stopped = port.snapshot();
    assert_eq!(stopped.pointer_x, listening.pointer_x);
    assert_eq!(stopped.pointer_y, listening.pointer_y);
}

#[wasm_bindgen_test]
fn surface_attaches_and_detaches() {
    let document = window().document().unwrap();
    let body = document.body().unwrap();
    let children = body.child_element_count();

    let gate = VisibilityGate::new(&VisibilityConfig::default(), 0.0, 800.0);
    let surface = Surface::attach(&document, &body, &gate).unwrap();
    assert_eq!(body.child_element_count(), children + 1);

    let overlay = body.last_element_child().unwrap();
    let style = overlay.get_attribute("style").unwrap();
    assert!(style.contains("pointer-events: none"));
    assert!(style.contains("opacity: 0"));
    assert_eq!(overlay.child_element_count(), 2);

    surface.detach();
    assert_eq!(body.child_element_count(), children);
}

#[wasm_bindgen_test]
fn unmount_removes_overlay() {
    let document = window().document().unwrap();
    let body = document.body().unwrap();
    let children = body.child_element_count();

    // Headless browsers without WebGL2 cannot mount at all
    let mut backdrop = match InteractiveBackdrop::mount(body.clone(), Some("seed: 3".to_string())) {
        Ok(backdrop) => backdrop,
        Err(_) => return,
    };
    assert!(backdrop.is_mounted());
    assert_eq!(body.child_element_count(), children + 1);

    backdrop.unmount();
    assert!(!backdrop.is_mounted());
    assert!(!backdrop.is_visible());
    assert_eq!(body.child_element_count(), children);

    // Second unmount is a no-op
    backdrop.unmount();
    assert_eq!(body.child_element_count(), children);
}
