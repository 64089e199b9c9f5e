//! The validated, immutable grants table.

use crate::matcher::GrantPattern;
use crate::types::GrantsSpec;
use indexmap::IndexMap;
use rolegate_types::GrantError;

/// Role names mapped to compiled grant patterns.
///
/// Every pattern is compiled when the table is built, so a malformed pattern
/// fails construction and evaluation itself can never fail. Roles are looked
/// up by exact key; names like `toString` or `__proto__` are ordinary keys.
#[derive(Debug, Clone, Default)]
pub struct Grants {
    roles: IndexMap<String, Vec<GrantPattern>>,
}

impl Grants {
    /// Build a grants table from a raw role → patterns mapping.
    pub fn new(spec: GrantsSpec) -> Result<Self, GrantError> {
        Self::from_roles(spec)
    }

    /// A table with no roles. Grants nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a grants table from `(role, patterns)` pairs.
    ///
    /// Role order is kept. A role listed twice keeps its first position and
    /// takes the later pattern list.
    pub fn from_roles<I, R, P, S>(roles: I) -> Result<Self, GrantError>
    where
        I: IntoIterator<Item = (R, P)>,
        R: Into<String>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = IndexMap::new();
        for (role, patterns) in roles {
            let role = role.into();
            let patterns = patterns
                .into_iter()
                .map(|p| {
                    let p = p.as_ref();
                    GrantPattern::new(p).map_err(|e| GrantError::InvalidPattern {
                        role: role.clone(),
                        pattern: p.to_string(),
                        message: e.kind().to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            compiled.insert(role, patterns);
        }

        let grants = Self { roles: compiled };
        tracing::debug!(
            roles = grants.len(),
            patterns = grants.pattern_count(),
            "Built grants table"
        );
        Ok(grants)
    }

    /// Role names in insertion order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Compiled patterns of a role, or `None` for an unknown role.
    pub fn patterns(&self, role: &str) -> Option<&[GrantPattern]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Total number of patterns across all roles.
    pub fn pattern_count(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    /// `(role, patterns)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GrantPattern])> {
        self.roles.iter().map(|(r, p)| (r.as_str(), p.as_slice()))
    }

    /// The raw mapping this table was built from.
    pub fn to_spec(&self) -> GrantsSpec {
        self.roles
            .iter()
            .map(|(role, patterns)| {
                let patterns = patterns.iter().map(|p| p.as_str().to_string()).collect();
                (role.clone(), patterns)
            })
            .collect()
    }
}

impl TryFrom<GrantsSpec> for Grants {
    type Error = GrantError;

    fn try_from(spec: GrantsSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}
