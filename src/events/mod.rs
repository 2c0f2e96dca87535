//! Event dispatch for authentication activity.
//!
//! Events are fired from the [`SessionManager`](crate::SessionManager). If
//! no listeners are registered they are silently ignored.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use volunhub::register_event_listeners;
//! use volunhub::events::listeners::LoggingListener;
//!
//! fn main() {
//!     register_event_listeners(|registry| {
//!         registry.listen(LoggingListener::new());
//!     });
//!
//!     // events will now be logged
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AuthEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners, EventRegistry};
