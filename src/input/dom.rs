//! Browser-backed event source: listeners on `window`

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, Window};

use super::port::{EventHandler, EventSource, SubscriptionId};
use super::state::{normalize_pointer, InputEvent, InputState, Viewport};

/// A registered DOM listener; the closure must outlive its registration
struct Listener {
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Pointer, scroll and resize listeners attached to the window
pub struct WindowEvents {
    window: Window,
    listeners: HashMap<SubscriptionId, Vec<Listener>>,
    next_id: u32,
}

impl WindowEvents {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    fn listen(&self, kind: &'static str, closure: Closure<dyn FnMut(Event)>) -> Result<Listener, String> {
        self.window
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to add '{}' listener: {:?}", kind, e))?;
        Ok(Listener { kind, closure })
    }

    fn remove(&self, listener: &Listener) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback(listener.kind, listener.closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove '{}' listener: {:?}", listener.kind, e);
        }
    }
}

/// Current viewport of a window, zero when unavailable
pub fn window_viewport(window: &Window) -> Viewport {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width as f32, height as f32)
}

/// Current vertical scroll offset of a window, zero when unavailable
pub fn window_scroll(window: &Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

impl EventSource for WindowEvents {
    fn sample(&self) -> InputState {
        InputState::new(window_scroll(&self.window), window_viewport(&self.window))
    }

    fn subscribe(&mut self, handler: EventHandler) -> Result<SubscriptionId, String> {
        let pointer = {
            let handler = handler.clone();
            let window = self.window.clone();
            Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    let (x, y) = normalize_pointer(
                        mouse.client_x() as f32,
                        mouse.client_y() as f32,
                        window_viewport(&window),
                    );
                    handler(InputEvent::PointerMove { x, y });
                }
            })
        };

        let scroll = {
            let handler = handler.clone();
            let window = self.window.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                handler(InputEvent::Scroll { offset: window_scroll(&window) });
            })
        };

        let resize = {
            let window = self.window.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                let viewport = window_viewport(&window);
                handler(InputEvent::Resize { width: viewport.width, height: viewport.height });
            })
        };

        let mut registered = Vec::with_capacity(3);
        for (kind, closure) in [("pointermove", pointer), ("scroll", scroll), ("resize", resize)] {
            match self.listen(kind, closure) {
                Ok(listener) => registered.push(listener),
                Err(e) => {
                    // Roll back the listeners that did register
                    for listener in &registered {
                        self.remove(listener);
                    }
                    return Err(e);
                }
            }
        }

        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(id, registered);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(listeners) = self.listeners.remove(&id) {
            for listener in &listeners {
                self.remove(listener);
            }
        }
    }
}

impl Drop for WindowEvents {
    fn drop(&mut self) {
        let ids: Vec<SubscriptionId> = self.listeners.keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }
}
