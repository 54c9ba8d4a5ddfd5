//! Input sampling: pointer position, scroll offset and viewport size
//!
//! The core only ever reads an [`InputState`] snapshot. Where the signals
//! come from is behind the [`EventSource`] trait so the lifecycle can be
//! exercised without a browser.

pub mod state;
pub mod port;
pub mod dom;

pub use state::{InputEvent, InputState, Viewport, normalize_pointer};
pub use port::{EventHandler, EventSource, InputPort, SubscriptionId};
pub use dom::WindowEvents;
