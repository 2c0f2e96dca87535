use async_trait::async_trait;

use super::AuthEvent;

/// Trait for handling authentication events asynchronously.
///
/// Listeners can perform any async operation: logging, notifications,
/// metrics. Filter by matching on the event variant.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event.
    async fn handle(&self, event: &AuthEvent);
}
