use crate::input::events::LayerEvent;
use crate::prelude::HashMap;

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&LayerEvent) + Send + Sync>;

/// Per-layer listener registry. Events are delivered synchronously, in
/// registration order, before `fire` returns.
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&LayerEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Drop every listener registered for `event_type`
    pub fn off(&mut self, event_type: &str) {
        self.listeners.remove(event_type);
    }

    /// Deliver an event to its listeners
    pub fn fire(&self, event: &LayerEvent) {
        if let Some(callbacks) = self.listeners.get(event.event_type()) {
            for callback in callbacks {
                callback(event);
            }
        }
    }

    /// Check whether anyone listens for `event_type`
    pub fn listens(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .map(|callbacks| !callbacks.is_empty())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("event_types", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}
