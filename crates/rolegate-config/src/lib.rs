//! Multi-tier TOML configuration for Rolegate.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults

use rolegate_permissions::{Grants, GrantsSpec};
use rolegate_types::{ConfigError, GrantError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the grants file.
pub const GRANTS_ENV: &str = "ROLEGATE_GRANTS";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "ROLEGATE_CONFIG_DIR";

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct RolegateConfig {
    pub config_dir: PathBuf,
    /// The grants file the role table came from, if any.
    pub grants_file: Option<PathBuf>,
    /// Raw role table, not yet validated.
    pub roles: GrantsSpec,
    /// Roles implicitly held by every principal.
    pub default_roles: Vec<String>,
}

/// Settings that can be read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub grants: GrantsSettings,
    #[serde(default)]
    pub defaults: DefaultsSettings,
    /// Inline role table, used when no grants file is configured.
    #[serde(default)]
    pub roles: GrantsSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantsSettings {
    /// Path to a grants file, relative to the config directory.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsSettings {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub grants_file: Option<PathBuf>,
}

impl RolegateConfig {
    /// Load configuration from all sources, applying precedence rules.
    ///
    /// Grants file precedence (highest to lowest):
    /// 1. CLI `--grants`
    /// 2. `ROLEGATE_GRANTS`
    /// 3. `[grants].file` in `config.toml`
    /// 4. Inline `[roles]` table in `config.toml`
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let env_grants = std::env::var_os(GRANTS_ENV).map(PathBuf::from);
        Self::load_from(config_dir(), overrides, env_grants)
    }

    fn load_from(
        config_dir: PathBuf,
        overrides: CliOverrides,
        env_grants: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let settings = load_settings_file(&config_dir.join("config.toml"))?;

        let grants_file = overrides.grants_file.or(env_grants).or_else(|| {
            settings
                .grants
                .file
                .as_ref()
                .map(|file| config_dir.join(file))
        });

        let roles = match &grants_file {
            Some(path) => {
                if !settings.roles.is_empty() {
                    tracing::warn!(
                        "Ignoring inline [roles] in config.toml; using {}",
                        path.display()
                    );
                }
                load_grants_file(path)?
            }
            None => settings.roles,
        };

        tracing::debug!(
            roles = roles.len(),
            source = ?grants_file,
            "Loaded role table"
        );

        Ok(RolegateConfig {
            config_dir,
            grants_file,
            roles,
            default_roles: settings.defaults.roles,
        })
    }

    /// Compile the role table into a validated grants table.
    pub fn grants(&self) -> Result<Grants, GrantError> {
        Grants::new(self.roles.clone())
    }

    /// The default roles followed by `held`.
    pub fn principal_roles<S: AsRef<str>>(&self, held: &[S]) -> Vec<String> {
        self.default_roles
            .iter()
            .cloned()
            .chain(held.iter().map(|r| r.as_ref().to_string()))
            .collect()
    }
}

/// Get the Rolegate config directory path (~/.rolegate/).
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rolegate")
}

/// Read a grants file: a TOML table of role names to pattern arrays.
pub fn load_grants_file(path: &Path) -> Result<GrantsSpec, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_grants(&content).map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

/// Parse grants TOML. Role order follows the document.
pub fn parse_grants(content: &str) -> Result<GrantsSpec, String> {
    toml::from_str(content).map_err(|e| e.message().to_string())
}

/// Load and parse a TOML settings file. A missing file yields defaults; a
/// file that exists but does not parse is an error, since it may hold the
/// role table.
fn load_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(SettingsFile::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GRANTS: &str = r#"
editor = ["content.edit.*", "image.upload"]
viewer = ["content.view.*", "image.view"]
admin = ["*"]
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn role_names(config: &RolegateConfig) -> Vec<&str> {
        config.roles.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = SettingsFile::default();
        assert!(settings.grants.file.is_none());
        assert!(settings.defaults.roles.is_empty());
        assert!(settings.roles.is_empty());
    }

    #[test]
    fn test_parse_grants_keeps_document_order() {
        let spec = parse_grants(GRANTS).unwrap();
        assert_eq!(
            spec.keys().map(String::as_str).collect::<Vec<_>>(),
            ["editor", "viewer", "admin"]
        );
        assert_eq!(spec["editor"], ["content.edit.*", "image.upload"]);
    }

    #[test]
    fn test_parse_grants_rejects_non_array() {
        assert!(parse_grants(r#"editor = "content.edit.*""#).is_err());
    }

    #[test]
    fn test_settings_toml_parse() {
        let toml_str = r#"
[grants]
file = "grants.toml"

[defaults]
roles = ["everyone"]

[roles]
viewer = ["content.view.*"]
"#;
        let settings: SettingsFile = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.grants.file.as_deref(), Some(Path::new("grants.toml")));
        assert_eq!(settings.defaults.roles, ["everyone"]);
        assert_eq!(settings.roles["viewer"], ["content.view.*"]);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            RolegateConfig::load_from(dir.path().to_path_buf(), CliOverrides::default(), None)
                .unwrap();
        assert!(config.roles.is_empty());
        assert!(config.grants_file.is_none());
        assert!(config.default_roles.is_empty());
    }

    #[test]
    fn test_unparsable_config_is_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "config.toml", "this is [not toml");
        let err =
            RolegateConfig::load_from(dir.path().to_path_buf(), CliOverrides::default(), None)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_malformed_inline_roles_fail_to_load() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "config.toml",
            "[roles]\nadmin = [\"*\"]\nviewer = \"content.view.*\"\n",
        );
        let err =
            RolegateConfig::load_from(dir.path().to_path_buf(), CliOverrides::default(), None)
                .unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert!(path.ends_with("config.toml")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_roles() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "config.toml",
            "[defaults]\nroles = [\"everyone\"]\n\n[roles]\neveryone = [\"content.read.homepage\"]\n",
        );
        let config =
            RolegateConfig::load_from(dir.path().to_path_buf(), CliOverrides::default(), None)
                .unwrap();
        assert_eq!(role_names(&config), ["everyone"]);
        assert_eq!(config.principal_roles(&["viewer"]), ["everyone", "viewer"]);
    }

    #[test]
    fn test_config_grants_file_relative_to_config_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "grants.toml", GRANTS);
        write(
            dir.path(),
            "config.toml",
            "[grants]\nfile = \"grants.toml\"\n\n[roles]\nignored = [\"*\"]\n",
        );
        let config =
            RolegateConfig::load_from(dir.path().to_path_buf(), CliOverrides::default(), None)
                .unwrap();
        assert_eq!(config.grants_file, Some(dir.path().join("grants.toml")));
        assert_eq!(role_names(&config), ["editor", "viewer", "admin"]);
    }

    #[test]
    fn test_env_beats_config_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "grants.toml", GRANTS);
        let env_file = write(dir.path(), "env.toml", "env_role = [\"a.*\"]\n");
        write(dir.path(), "config.toml", "[grants]\nfile = \"grants.toml\"\n");
        let config = RolegateConfig::load_from(
            dir.path().to_path_buf(),
            CliOverrides::default(),
            Some(env_file),
        )
        .unwrap();
        assert_eq!(role_names(&config), ["env_role"]);
    }

    #[test]
    fn test_cli_beats_env() {
        let dir = TempDir::new().unwrap();
        let env_file = write(dir.path(), "env.toml", "env_role = [\"a.*\"]\n");
        let cli_file = write(dir.path(), "cli.toml", "cli_role = [\"b.*\"]\n");
        let config = RolegateConfig::load_from(
            dir.path().to_path_buf(),
            CliOverrides {
                grants_file: Some(cli_file.clone()),
            },
            Some(env_file),
        )
        .unwrap();
        assert_eq!(config.grants_file, Some(cli_file));
        assert_eq!(role_names(&config), ["cli_role"]);
    }

    #[test]
    fn test_missing_grants_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = RolegateConfig::load_from(
            dir.path().to_path_buf(),
            CliOverrides {
                grants_file: Some(dir.path().join("nope.toml")),
            },
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unparsable_grants_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "grants.toml", "editor = 42\n");
        let err = load_grants_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_grants_compiles_table() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "grants.toml", GRANTS);
        let config = RolegateConfig::load_from(
            dir.path().to_path_buf(),
            CliOverrides {
                grants_file: Some(path),
            },
            None,
        )
        .unwrap();
        let grants = config.grants().unwrap();
        assert_eq!(grants.len(), 3);
        assert!(grants.verifier(&["editor"]).has("image.upload"));
    }

    #[test]
    fn test_demo_config_loads() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let config = RolegateConfig::load_from(demos, CliOverrides::default(), None).unwrap();
        let grants = config.grants().unwrap();
        let roles = config.principal_roles(&["authenticated", "author"]);
        let can = grants.verifier(&roles);
        assert!(can.has("content.read.homepage"));
        assert!(can.has("content.write.post"));
        assert!(!can.has("content.write.feedback"));
        assert_eq!(
            grants.finder().find("content.write.feedback"),
            ["reviewer", "admin"]
        );
    }

    #[test]
    fn test_grants_reports_malformed_pattern() {
        let mut config =
            RolegateConfig::load_from(PathBuf::from("/nonexistent"), CliOverrides::default(), None)
                .unwrap();
        config
            .roles
            .insert("broken".into(), vec!["content.[".into()]);
        assert!(matches!(
            config.grants(),
            Err(GrantError::InvalidPattern { .. })
        ));
    }
}
