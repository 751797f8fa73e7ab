//! Error types for configuration parsing and validation.
//!
//! Two kinds of failure are kept apart:
//! - [`ConfigError`] covers structure and presence: missing sections,
//!   missing or blank fields, unknown servers, unreadable files.
//! - [`ValueError`] covers values that are present but unusable, such as
//!   a non-positive worker count or a malformed integer.
//!
//! A [`ValueError`] travels inside [`ConfigError::Value`] so callers deal
//! with a single `Result` type, while [`ConfigError::is_value_error`] still
//! tells the two kinds apart.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file as TOML.
    #[error("Failed to parse TOML config '{}': {source}", path.display())]
    TomlParse {
        /// Path to the config file (`<string>` when parsed from memory)
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write a configuration template (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A top-level entry of the config file is not a usable section.
    #[error("Invalid section '{section}': {reason}")]
    InvalidSection {
        /// Name of the offending section
        section: String,
        /// Reason for invalidity
        reason: String,
    },

    /// No home directory to resolve default paths or `~` against.
    #[error("Cannot determine home directory; pass --config and --auth-config explicitly")]
    NoHomeDir,

    /// The credential file has no `[AUTH]` section.
    #[error("AuthConfig must contain [AUTH]")]
    MissingAuthSection,

    /// The `[AUTH]` section lacks a field, or the field is blank.
    #[error("AuthConfig must contain {field}")]
    MissingAuthField {
        /// Name of the missing field
        field: &'static str,
    },

    /// No `[DEFAULT]` section, or it has no `ConcurrentWorkers`.
    #[error("Config must contain ConcurrentWorkers")]
    MissingConcurrentWorkers,

    /// No server section exists, or none is enabled.
    #[error("You must configure at least one server")]
    NoServers,

    /// The server requested on the command line has no section.
    #[error("The specified server is not configured: {0}")]
    ServerNotConfigured(String),

    /// A server section lacks a field and there is no global default for it.
    #[error("Server Config for {server} is missing {field}")]
    ServerMissingField {
        /// Section name of the server
        server: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// A field is present but its value is out of range or malformed.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Error type for present-but-invalid values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// `ConcurrentWorkers` is zero or negative.
    #[error("Concurrent workers must be greater than 0")]
    NonPositiveWorkers,

    /// A per-server minutes value is zero or negative.
    #[error("{field} for {server} must be greater than 0")]
    NotPositive {
        /// Section name of the server
        server: String,
        /// Name of the field
        field: &'static str,
    },

    /// The value does not parse as an integer.
    #[error("Invalid integer for {field}: '{value}'")]
    InvalidInteger {
        /// Name of the field
        field: &'static str,
        /// The value as written
        value: String,
    },

    /// The value does not parse as a boolean.
    #[error("Invalid boolean for {field}: '{value}' (expected true/false, yes/no, on/off or 1/0)")]
    InvalidBoolean {
        /// Name of the field
        field: &'static str,
        /// The value as written
        value: String,
    },

    /// The integer does not fit the field's range.
    #[error("Value for {field} is out of range: {value}")]
    OutOfRange {
        /// Name of the field
        field: &'static str,
        /// The parsed value
        value: i64,
    },
}

/// Well-known field names, as written in the configuration files.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// Global worker count (`[DEFAULT]` only).
    pub const CONCURRENT_WORKERS: &str = "ConcurrentWorkers";
    /// Minutes before a pending image save is considered stuck.
    pub const SAVE_TIMEOUT_MINUTES: &str = "SaveTimeoutMinutes";
    /// Minutes after which an image may be pruned.
    pub const RETAIN_IMAGE_MINUTES: &str = "RetainImageMinutes";
    /// Cloud region of the server.
    pub const REGION: &str = "Region";
    /// Per-server enable switch.
    pub const ENABLED: &str = "Enabled";
    /// Account name in the credential file.
    pub const API_USER: &str = "ApiUser";
    /// API key in the credential file.
    pub const API_KEY: &str = "ApiKey";
}

impl ConfigError {
    /// Creates a `ServerMissingField` error for a server section.
    #[must_use]
    pub fn server_missing(server: &str, field: &'static str) -> Self {
        Self::ServerMissingField {
            server: server.to_string(),
            field,
        }
    }

    /// Returns `true` for value-range failures, `false` for structural ones.
    #[must_use]
    pub const fn is_value_error(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}
