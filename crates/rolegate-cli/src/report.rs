//! Plain-text and JSON rendering of command results.

use rolegate_types::PermissionDenied;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub permission: String,
    pub roles: Vec<String>,
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied: Option<PermissionDenied>,
}

#[derive(Debug, Serialize)]
pub struct RolesReport {
    pub permission: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateReport {
    pub source: String,
    pub roles: usize,
    pub patterns: usize,
}

impl CheckReport {
    fn render(&self) -> String {
        let verdict = if self.granted { "granted" } else { "denied" };
        match &self.denied {
            Some(denied) => format!("{verdict}\n{denied}"),
            None => verdict.to_string(),
        }
    }

    pub fn print(&self, json: bool) -> serde_json::Result<()> {
        emit(self, json, Self::render)
    }
}

impl RolesReport {
    fn render(&self) -> String {
        self.roles.join("\n")
    }

    pub fn print(&self, json: bool) -> serde_json::Result<()> {
        emit(self, json, Self::render)
    }
}

impl ValidateReport {
    fn render(&self) -> String {
        format!(
            "{}: {} roles, {} patterns",
            self.source, self.roles, self.patterns
        )
    }

    pub fn print(&self, json: bool) -> serde_json::Result<()> {
        emit(self, json, Self::render)
    }
}

fn emit<T: Serialize>(report: &T, json: bool, render: fn(&T) -> String) -> serde_json::Result<()> {
    let out = if json {
        serde_json::to_string_pretty(report)?
    } else {
        render(report)
    };
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> PermissionDenied {
        PermissionDenied {
            permission: "image.upload".into(),
            required: vec!["editor".into(), "admin".into()],
            held: vec!["viewer".into()],
        }
    }

    #[test]
    fn test_check_granted_text() {
        let r = CheckReport {
            permission: "image.view".into(),
            roles: vec!["viewer".into()],
            granted: true,
            denied: None,
        };
        assert_eq!(r.render(), "granted");
    }

    #[test]
    fn test_check_denied_explained_text() {
        let r = CheckReport {
            permission: "image.upload".into(),
            roles: vec!["viewer".into()],
            granted: false,
            denied: Some(denied()),
        };
        assert_eq!(
            r.render(),
            "denied\nYou must have one of the following roles: editor; admin. You have: viewer."
        );
    }

    #[test]
    fn test_check_json_skips_missing_denial() {
        let r = CheckReport {
            permission: "image.view".into(),
            roles: vec!["viewer".into()],
            granted: true,
            denied: None,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["granted"], true);
        assert!(v.get("denied").is_none());
    }

    #[test]
    fn test_check_json_includes_denial() {
        let r = CheckReport {
            permission: "image.upload".into(),
            roles: vec!["viewer".into()],
            granted: false,
            denied: Some(denied()),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["denied"]["required"][1], "admin");
    }

    #[test]
    fn test_roles_text_one_per_line() {
        let r = RolesReport {
            permission: "image.upload".into(),
            roles: vec!["editor".into(), "admin".into()],
        };
        assert_eq!(r.render(), "editor\nadmin");
    }

    #[test]
    fn test_validate_text() {
        let r = ValidateReport {
            source: "grants.toml".into(),
            roles: 3,
            patterns: 5,
        };
        assert_eq!(r.render(), "grants.toml: 3 roles, 5 patterns");
    }
}
