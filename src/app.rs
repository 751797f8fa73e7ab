//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use imageroller::config::{ConfigError, ValueError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - unreadable files, missing or invalid values.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;
}

/// Returns a hint for common configuration errors, if there is one.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::FileRead { .. } | ConfigError::NoHomeDir => {
            Some("Run 'imageroller init' to generate configuration templates.")
        }
        ConfigError::NoServers => {
            Some("Set 'Enabled = true' in a server section, or name one with --server.")
        }
        ConfigError::MissingAuthSection | ConfigError::MissingAuthField { .. } => {
            Some("The credential file needs an [AUTH] section with ApiUser and ApiKey.")
        }
        ConfigError::Value(ValueError::InvalidBoolean { .. }) => {
            Some("Use Enabled = true or Enabled = false.")
        }
        _ => None,
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
