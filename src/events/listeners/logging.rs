use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Logs every authentication event through the `log` crate.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Creates a listener logging at INFO.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &AuthEvent) {
        log::log!(
            target: "volunhub_auth::events",
            self.level,
            "event={} {:?}",
            event.name(),
            event
        );
    }
}
