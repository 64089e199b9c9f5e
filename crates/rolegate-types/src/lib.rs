//! Shared error hierarchy for Rolegate.

pub mod error;

pub use error::{ConfigError, GrantError, PermissionDenied, RolegateError};
