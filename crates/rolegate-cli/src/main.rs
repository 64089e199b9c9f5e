//! Rolegate CLI: check role-based permissions against a grants file.

mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use report::{CheckReport, RolesReport, ValidateReport};
use rolegate_config::{CliOverrides, RolegateConfig};
use rolegate_permissions::Grants;
use rolegate_types::RolegateError;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// `check` found no granting role.
const EXIT_DENIED: u8 = 1;

/// Configuration or grants could not be loaded. Kept apart from a denial.
const EXIT_LOAD_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "rolegate", version, about = "Check role-based permissions")]
struct Cli {
    /// Grants file (overrides ROLEGATE_GRANTS and config.toml)
    #[arg(long, global = true)]
    grants: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether a set of roles grants a permission
    ///
    /// Exit status: 0 if granted, 1 if denied, 2 if the configuration or
    /// grants failed to load.
    Check {
        /// Permission name, e.g. content.read.comment
        permission: String,

        /// Role held by the principal (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,

        /// Explain a denial
        #[arg(long)]
        explain: bool,

        /// Don't prepend the default roles from config.toml
        #[arg(long)]
        no_defaults: bool,
    },

    /// List the roles that would grant a permission
    Roles {
        /// Permission name, e.g. content.read.comment
        permission: String,
    },

    /// Load and compile the grants, reporting any malformed pattern
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let (config, grants) = match load(cli.grants).context("Failed to load grants") {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Ok(ExitCode::from(EXIT_LOAD_ERROR));
        }
    };

    match cli.command {
        Command::Check {
            permission,
            roles,
            explain,
            no_defaults,
        } => {
            let roles = if no_defaults {
                roles
            } else {
                config.principal_roles(&roles)
            };
            tracing::debug!(?roles, %permission, "Checking permission");
            let verifier = grants.verifier(&roles);
            let denied = verifier.require(&permission).err();
            let granted = denied.is_none();

            let report = CheckReport {
                permission,
                roles,
                granted,
                denied: if explain { denied } else { None },
            };
            report.print(cli.json)?;

            Ok(if granted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_DENIED)
            })
        }
        Command::Roles { permission } => {
            let roles = grants
                .finder()
                .find(&permission)
                .into_iter()
                .map(str::to_string)
                .collect();
            RolesReport { permission, roles }.print(cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate => {
            let report = ValidateReport {
                source: config
                    .grants_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| config.config_dir.join("config.toml").display().to_string()),
                roles: grants.len(),
                patterns: grants.pattern_count(),
            };
            report.print(cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Resolve the configuration and compile its grants table.
fn load(grants_file: Option<PathBuf>) -> Result<(RolegateConfig, Grants), RolegateError> {
    let config = RolegateConfig::load(CliOverrides { grants_file })?;
    let grants = config.grants()?;
    Ok((config, grants))
}
