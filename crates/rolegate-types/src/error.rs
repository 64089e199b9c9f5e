//! Error hierarchy for Rolegate.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Top-level error type for all Rolegate operations.
#[derive(Debug, Error)]
pub enum RolegateError {
    #[error("Grant error: {0}")]
    Grant(#[from] GrantError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Permission denied: {0}")]
    Denied(#[from] PermissionDenied),
}

/// Errors raised while building a grants table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantError {
    #[error("Invalid pattern '{pattern}' in role '{role}': {message}")]
    InvalidPattern {
        role: String,
        pattern: String,
        message: String,
    },
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// A negative authorization result, carried as an error by callers that
/// want to stop on denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDenied {
    /// The permission that was checked.
    pub permission: String,
    /// Roles that would have granted the permission, in grants order.
    pub required: Vec<String>,
    /// Roles held by the principal.
    pub held: Vec<String>,
}

impl fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required.is_empty() {
            write!(f, "No role grants '{}'.", self.permission)?;
        } else {
            write!(
                f,
                "You must have one of the following roles: {}.",
                self.required.join("; ")
            )?;
        }
        if self.held.is_empty() {
            write!(f, " You have no roles.")
        } else {
            write!(f, " You have: {}.", self.held.join("; "))
        }
    }
}

impl std::error::Error for PermissionDenied {}
