//! Glob matcher: compiles grant patterns and matches permission names.

use globset::{GlobBuilder, GlobMatcher};

/// A compiled grant pattern.
///
/// Syntax: `*` matches any run of characters except `/`, `**` crosses `/`,
/// `?` matches one character, `[...]` is a character class and `{a,b}` an
/// alternation. A leading `!` negates the pattern. The bare pattern `*` is
/// the universal grant and matches every permission name.
#[derive(Debug, Clone)]
pub struct GrantPattern {
    source: String,
    negated: bool,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Any,
    Glob(GlobMatcher),
}

impl GrantPattern {
    /// Compile a pattern, failing on malformed glob syntax.
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let bangs = pattern.len() - pattern.trim_start_matches('!').len();
        let body = &pattern[bangs..];

        let kind = if body == "*" {
            PatternKind::Any
        } else {
            let glob = GlobBuilder::new(body)
                .literal_separator(true)
                .case_insensitive(false)
                .build()?;
            PatternKind::Glob(glob.compile_matcher())
        };

        Ok(Self {
            source: pattern.to_string(),
            negated: bangs % 2 == 1,
            kind,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this pattern is negated (`!`-prefixed).
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Check a permission name against this pattern.
    pub fn is_match(&self, permission: &str) -> bool {
        let hit = match &self.kind {
            PatternKind::Any => true,
            PatternKind::Glob(glob) => glob.is_match(permission),
        };
        hit != self.negated
    }
}

/// True iff at least one of `patterns` matches `permission`.
pub fn matches_any<'a, I>(permission: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = &'a GrantPattern>,
{
    patterns.into_iter().any(|p| p.is_match(permission))
}
