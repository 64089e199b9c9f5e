//! Role-based permission evaluation for Rolegate.
//!
//! Roles are named bundles of glob grants. A principal holds any number of
//! roles; there is no inheritance between them.
//!
//! Entry points: [`check_permission`] / [`find_roles`], or their partially
//! applied forms [`check_permission_for`] and [`find_roles_for`].

pub mod checker;
pub mod grants;
pub mod matcher;
pub mod resolver;
pub mod types;

pub use checker::{GrantsChecker, RoleVerifier, check_permission, check_permission_for};
pub use grants::Grants;
pub use matcher::{GrantPattern, matches_any};
pub use resolver::{RoleFinder, find_roles, find_roles_for};
pub use rolegate_types::{GrantError, PermissionDenied};
pub use types::*;
