//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use std::path::PathBuf;

/// Name of the section holding global values.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Name of the credential section in the auth file.
pub const AUTH_SECTION: &str = "AUTH";

/// Directory under the user's home holding both files.
pub const CONFIG_DIR_NAME: &str = ".imageroller";

/// File name of the main configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name of the credential file.
pub const AUTH_FILE_NAME: &str = "auth.toml";

/// Value of `Enabled` when a server section does not set it.
pub const ENABLED: bool = false;

/// Seconds per configured minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Default configuration directory (`~/.imageroller`).
///
/// Returns `None` if the home directory cannot be determined.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}

/// Default configuration file path.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Default credential file path.
#[must_use]
pub fn auth_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(AUTH_FILE_NAME))
}
