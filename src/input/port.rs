use std::cell::Cell;
use std::rc::Rc;

use super::state::{InputEvent, InputState};

/// Callback invoked by an event source for every input signal
pub type EventHandler = Rc<dyn Fn(InputEvent)>;

/// Handle returned by [`EventSource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Something that can deliver pointer, scroll and resize signals
pub trait EventSource {
    /// Read the current scroll offset and viewport without waiting for an event
    fn sample(&self) -> InputState;

    fn subscribe(&mut self, handler: EventHandler) -> Result<SubscriptionId, String>;

    /// Release every listener registered under `id`
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// The single shared input subscription for the whole backdrop
///
/// One writer (the event source's callbacks) and many readers (the fields
/// and the camera, through [`InputPort::snapshot`]). Listeners are
/// registered by `start` and released by `stop` or on drop.
pub struct InputPort<S: EventSource> {
    source: S,
    state: Rc<Cell<InputState>>,
    subscription: Option<SubscriptionId>,
}

impl<S: EventSource> InputPort<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Rc::new(Cell::new(InputState::default())),
            subscription: None,
        }
    }

    /// Sample the current signals and begin listening. Calling twice is a no-op.
    pub fn start(&mut self) -> Result<(), String> {
        if self.subscription.is_some() {
            return Ok(());
        }

        self.state.set(self.source.sample());

        let state = Rc::clone(&self.state);
        let handler: EventHandler = Rc::new(move |event| {
            let mut current = state.get();
            current.apply(event);
            state.set(current);
        });

        self.subscription = Some(self.source.subscribe(handler)?);
        log::debug!("input port started");
        Ok(())
    }

    /// Remove all listeners. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
            log::debug!("input port stopped");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Latest input values, copied out for one tick
    pub fn snapshot(&self) -> InputState {
        self.state.get()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: EventSource> Drop for InputPort<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
