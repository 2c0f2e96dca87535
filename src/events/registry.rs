use std::sync::OnceLock;

use super::{AuthEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Registry holding all registered event listeners.
///
/// Use [`register_event_listeners`] to configure listeners at startup.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners are called in registration order.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    async fn dispatch(&self, event: &AuthEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Register event listeners once at application startup.
///
/// Only the first call takes effect; later calls log a warning.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "volunhub_auth",
            "register_event_listeners called more than once, ignoring"
        );
    }
}

/// Dispatch an event to all registered listeners. No-op when none are
/// registered.
pub async fn dispatch(event: AuthEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
