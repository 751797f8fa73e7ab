//! Validated configuration after loading both files and applying the CLI.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::cli::{Cli, RunArgs};
use super::credentials::Credentials;
use super::defaults;
use super::error::ConfigError;
use super::global::GlobalConfig;
use super::toml::{AuthFile, ConfigFile, default_auth_template, default_config_template};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::load`] to read both files named on the command
/// line (or the defaults under `~/.imageroller`), or
/// [`ValidatedConfig::from_raw`] for already-parsed files.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Worker count and enabled servers
    pub global: GlobalConfig,

    /// API credentials
    pub credentials: Credentials,

    /// Force rotation (passed through to the rotation step)
    pub force: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ user: {}, {}, force: {} }}",
            self.credentials.user(),
            self.global,
            self.force,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and parsed files.
    ///
    /// The configuration file is resolved before the credentials, so a
    /// broken configuration is reported first.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or credential validation error.
    pub fn from_raw(cli: &Cli, config: &ConfigFile, auth: &AuthFile) -> Result<Self, ConfigError> {
        let args = RunArgs::from(cli);
        let global = GlobalConfig::from_raw(&args, config)?;
        let credentials = Credentials::from_raw(auth)?;

        Ok(Self {
            global,
            credentials,
            force: args.force,
            verbose: cli.verbose,
        })
    }

    /// Loads both files and validates them.
    ///
    /// Paths come from `--config` / `--auth-config`, falling back to
    /// `~/.imageroller/config.toml` and `~/.imageroller/auth.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A path cannot be resolved (no home directory)
    /// - A file cannot be read or parsed
    /// - The configuration or credentials are invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path = resolve_path(cli.config.as_deref(), defaults::config_path)?;
        let auth_path = resolve_path(cli.auth_config.as_deref(), defaults::auth_path)?;

        tracing::debug!("Reading configuration from {}", config_path.display());
        let config = ConfigFile::load(&config_path)?;

        tracing::debug!("Reading credentials from {}", auth_path.display());
        let auth = AuthFile::load(&auth_path)?;

        Self::from_raw(cli, &config, &auth)
    }
}

/// Returns the explicit path (with `~` expanded) or the default.
fn resolve_path(
    explicit: Option<&Path>,
    default: fn() -> Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => expand_tilde(path),
        None => default().ok_or(ConfigError::NoHomeDir),
    }
}

/// Expands a leading `~` component to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDir`] if the path starts with `~` and the
/// home directory cannot be determined.
pub fn expand_tilde(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or(ConfigError::NoHomeDir),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Writes the configuration and credential templates into `dir`.
///
/// Returns the paths written. Either both files are written or neither:
/// existing files are left untouched and reported as an error.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file exists
/// or cannot be written.
pub fn write_default_configs(dir: &Path) -> Result<[PathBuf; 2], ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::FileWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let config_path = dir.join(defaults::CONFIG_FILE_NAME);
    let auth_path = dir.join(defaults::AUTH_FILE_NAME);

    if let Some(existing) = [&config_path, &auth_path].into_iter().find(|p| p.exists()) {
        return Err(ConfigError::FileWrite {
            path: existing.clone(),
            source: io::Error::from(io::ErrorKind::AlreadyExists),
        });
    }

    write_new(&config_path, &default_config_template())?;
    if let Err(e) = write_new(&auth_path, &default_auth_template()) {
        if let Err(cleanup) = std::fs::remove_file(&config_path) {
            tracing::warn!("Failed to remove {}: {cleanup}", config_path.display());
        }
        return Err(e);
    }

    Ok([config_path, auth_path])
}

fn write_new(path: &Path, content: &str) -> Result<(), ConfigError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()))
        .map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
