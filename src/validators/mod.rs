//! Input shape validation for the authentication endpoints.

pub mod email;

pub use email::is_valid_email;
