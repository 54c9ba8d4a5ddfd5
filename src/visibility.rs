//! Presentational on/off switch for the whole overlay
//!
//! The gate only decides opacity. Whether the simulation keeps running
//! while hidden is the caller's choice (see `VisibilityConfig`).

use crate::config::VisibilityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub fn opacity(self) -> f32 {
        match self {
            Visibility::Hidden => 0.0,
            Visibility::Visible => 1.0,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityGate {
    state: Visibility,
    threshold: f32,
    transition_ms: u32,
}

impl VisibilityGate {
    /// Build a gate whose state reflects the current scroll position
    pub fn new(config: &VisibilityConfig, scroll_y: f32, viewport_height: f32) -> Self {
        let mut gate = Self {
            state: Visibility::Hidden,
            threshold: config.threshold,
            transition_ms: config.transition_ms,
        };
        gate.state = gate.evaluate(scroll_y, viewport_height);
        gate
    }

    /// Visible once the page is scrolled strictly past `threshold * height`
    pub fn evaluate(&self, scroll_y: f32, viewport_height: f32) -> Visibility {
        let height = if viewport_height.is_finite() && viewport_height > 0.0 {
            viewport_height
        } else {
            0.0
        };

        if scroll_y > self.threshold * height {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    /// Re-evaluate; returns true when the state flipped
    pub fn update(&mut self, scroll_y: f32, viewport_height: f32) -> bool {
        let next = self.evaluate(scroll_y, viewport_height);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn opacity(&self) -> f32 {
        self.state.opacity()
    }

    pub fn transition_ms(&self) -> u32 {
        self.transition_ms
    }

    /// Inline CSS for the overlay wrapper. Pointer events stay disabled in both states.
    pub fn overlay_style(&self) -> String {
        format!(
            "position: fixed; inset: 0; width: 100vw; height: 100vh; z-index: -1; \
             overflow: hidden; pointer-events: none; \
             transition: opacity {}ms; opacity: {};",
            self.transition_ms,
            self.opacity()
        )
    }
}
