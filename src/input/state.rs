/// Size of the hosting viewport in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Width over height, or 0 for a collapsed viewport
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

/// A raw signal delivered by the host page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position already normalized to [-1, 1] on both axes (+y up)
    PointerMove { x: f32, y: f32 },
    /// Vertical document scroll offset in pixels
    Scroll { offset: f32 },
    Resize { width: f32, height: f32 },
}

/// Latest values of every input signal
///
/// Events overwrite fields in place; a frame only ever sees the most recent
/// value, however many events arrived since the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub scroll_y: f32,
    pub viewport: Viewport,
}

impl InputState {
    pub fn new(scroll_y: f32, viewport: Viewport) -> Self {
        Self {
            scroll_y: sanitize_extent(scroll_y),
            viewport,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.pointer_x = sanitize_unit(x);
                self.pointer_y = sanitize_unit(y);
            }
            InputEvent::Scroll { offset } => {
                self.scroll_y = sanitize_extent(offset);
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
            }
        }
    }
}

/// Map client pixel coordinates to the [-1, 1] range with +y pointing up
pub fn normalize_pointer(client_x: f32, client_y: f32, viewport: Viewport) -> (f32, f32) {
    let x = if viewport.width > 0.0 {
        client_x / viewport.width * 2.0 - 1.0
    } else {
        0.0
    };
    let y = if viewport.height > 0.0 {
        -(client_y / viewport.height) * 2.0 + 1.0
    } else {
        0.0
    };
    (sanitize_unit(x), sanitize_unit(y))
}

fn sanitize_unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut state = InputState::default();
        state.apply(InputEvent::Scroll { offset: 120.0 });
        state.apply(InputEvent::Scroll { offset: 80.0 });
        state.apply(InputEvent::PointerMove { x: 0.5, y: -0.25 });
        assert_eq!(state.scroll_y, 80.0);
        assert_eq!(state.pointer_x, 0.5);
        assert_eq!(state.pointer_y, -0.25);
    }

    #[test]
    fn test_degenerate_values_are_sanitized() {
        let mut state = InputState::default();
        state.apply(InputEvent::PointerMove { x: f32::NAN, y: 3.0 });
        assert_eq!(state.pointer_x, 0.0);
        assert_eq!(state.pointer_y, 1.0);

        state.apply(InputEvent::Scroll { offset: -40.0 });
        assert_eq!(state.scroll_y, 0.0);

        state.apply(InputEvent::Resize { width: f32::INFINITY, height: 600.0 });
        assert_eq!(state.viewport.width, 0.0);
        assert_eq!(state.viewport.height, 600.0);
    }

    #[test]
    fn test_normalize_pointer() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(normalize_pointer(0.0, 0.0, viewport), (-1.0, 1.0));
        assert_eq!(normalize_pointer(400.0, 300.0, viewport), (0.0, 0.0));
        assert_eq!(normalize_pointer(800.0, 600.0, viewport), (1.0, -1.0));
    }

    #[test]
    fn test_normalize_pointer_zero_viewport() {
        let (x, y) = normalize_pointer(10.0, 10.0, Viewport::new(0.0, 0.0));
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn test_aspect_of_collapsed_viewport() {
        assert_eq!(Viewport::new(800.0, 0.0).aspect(), 0.0);
        assert!((Viewport::new(800.0, 400.0).aspect() - 2.0).abs() < 1e-6);
    }
}
