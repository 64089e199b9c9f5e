//! Permission checker: does a set of roles grant a permission?
//!
//! The check can be applied all at once with [`check_permission`], or in
//! steps: bind the grants with [`check_permission_for`], then bind a role set
//! with [`GrantsChecker::for_roles`] to get a reusable [`RoleVerifier`].

use crate::grants::Grants;
use crate::matcher::{GrantPattern, matches_any};
use crate::resolver::find_roles;
use rolegate_types::PermissionDenied;

/// Check whether any of `roles` grants `permission`.
///
/// Roles missing from `grants` contribute nothing. An empty role set, or one
/// made only of unknown roles, grants nothing.
pub fn check_permission<S: AsRef<str>>(grants: &Grants, roles: &[S], permission: &str) -> bool {
    let granted = matches_any(permission, effective_patterns(grants, roles));
    tracing::trace!(permission, roles = roles.len(), granted, "Checked permission");
    granted
}

/// Bind the grants table, leaving roles and permission open.
pub fn check_permission_for(grants: &Grants) -> GrantsChecker<'_> {
    GrantsChecker { grants }
}

/// Patterns of every known role in `roles`, in role order, duplicates kept.
fn effective_patterns<'g, S: AsRef<str>>(
    grants: &'g Grants,
    roles: &[S],
) -> impl Iterator<Item = &'g GrantPattern> {
    roles
        .iter()
        .filter_map(|role| grants.patterns(role.as_ref()))
        .flatten()
}

impl Grants {
    /// Same as [`check_permission_for`].
    pub fn checker(&self) -> GrantsChecker<'_> {
        check_permission_for(self)
    }

    /// Bind a role set to this table.
    pub fn verifier<S: AsRef<str>>(&self, roles: &[S]) -> RoleVerifier<'_> {
        RoleVerifier::new(self, roles)
    }
}

/// A checker bound to a grants table.
#[derive(Debug, Clone, Copy)]
pub struct GrantsChecker<'g> {
    grants: &'g Grants,
}

impl<'g> GrantsChecker<'g> {
    /// Check `permission` against `roles`.
    pub fn check<S: AsRef<str>>(&self, roles: &[S], permission: &str) -> bool {
        check_permission(self.grants, roles, permission)
    }

    /// Bind a role set, producing a verifier for that principal.
    pub fn for_roles<S: AsRef<str>>(&self, roles: &[S]) -> RoleVerifier<'g> {
        RoleVerifier::new(self.grants, roles)
    }

    /// The bound grants table, e.g. to resolve roles alongside checks.
    pub fn grants(&self) -> &'g Grants {
        self.grants
    }
}

/// A checker bound to a grants table and a role set.
///
/// The effective pattern set is collected once, as references into the
/// grants table; nothing is recompiled.
#[derive(Debug, Clone)]
pub struct RoleVerifier<'g> {
    grants: &'g Grants,
    roles: Vec<String>,
    patterns: Vec<&'g GrantPattern>,
}

impl<'g> RoleVerifier<'g> {
    fn new<S: AsRef<str>>(grants: &'g Grants, roles: &[S]) -> Self {
        Self {
            grants,
            roles: roles.iter().map(|r| r.as_ref().to_string()).collect(),
            patterns: effective_patterns(grants, roles).collect(),
        }
    }

    /// Whether the bound roles grant `permission`.
    pub fn has(&self, permission: &str) -> bool {
        let granted = matches_any(permission, self.patterns.iter().copied());
        tracing::trace!(permission, granted, "Verified permission");
        granted
    }

    /// Whether every one of `permissions` is granted. True for none.
    pub fn has_all<I, S>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions.into_iter().all(|p| self.has(p.as_ref()))
    }

    /// Whether at least one of `permissions` is granted. False for none.
    pub fn has_any<I, S>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions.into_iter().any(|p| self.has(p.as_ref()))
    }

    /// Like [`has`](Self::has), but a denial explains which roles would
    /// have granted the permission.
    pub fn require(&self, permission: &str) -> Result<(), PermissionDenied> {
        if self.has(permission) {
            return Ok(());
        }

        let denied = PermissionDenied {
            permission: permission.to_string(),
            required: find_roles(self.grants, permission)
                .into_iter()
                .map(str::to_string)
                .collect(),
            held: self.roles.clone(),
        };
        tracing::debug!(permission, required = ?denied.required, held = ?denied.held, "Permission denied");
        Err(denied)
    }

    /// The bound role set, as given.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The effective patterns, in role order.
    pub fn effective_patterns(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.patterns.iter().map(|&p| p.as_str())
    }
}
