//! Core types for the permission system.

use indexmap::IndexMap;

/// Name of a role. Compared by exact, case-sensitive string equality.
pub type RoleName = String;

/// Raw grants as supplied by the host: role name to glob patterns.
///
/// Key order is preserved and determines the order of
/// [`find_roles`](crate::find_roles) results.
pub type GrantsSpec = IndexMap<RoleName, Vec<String>>;
