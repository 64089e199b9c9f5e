//! Role resolver: which roles would grant a permission?

use crate::grants::Grants;
use crate::matcher::matches_any;

/// Roles with at least one pattern matching `permission`, in grants order.
///
/// Roles without patterns never appear. Returns an empty list when nothing
/// grants the permission.
pub fn find_roles<'g>(grants: &'g Grants, permission: &str) -> Vec<&'g str> {
    let roles: Vec<&str> = grants
        .iter()
        .filter(|(_, patterns)| matches_any(permission, patterns.iter()))
        .map(|(role, _)| role)
        .collect();
    tracing::trace!(permission, found = roles.len(), "Resolved roles");
    roles
}

/// Bind the grants table, leaving the permission open.
pub fn find_roles_for(grants: &Grants) -> RoleFinder<'_> {
    RoleFinder { grants }
}

impl Grants {
    /// Same as [`find_roles_for`].
    pub fn finder(&self) -> RoleFinder<'_> {
        find_roles_for(self)
    }
}

/// A resolver bound to a grants table.
#[derive(Debug, Clone, Copy)]
pub struct RoleFinder<'g> {
    grants: &'g Grants,
}

impl<'g> RoleFinder<'g> {
    /// Roles that would grant `permission`.
    pub fn find(&self, permission: &str) -> Vec<&'g str> {
        find_roles(self.grants, permission)
    }
}
