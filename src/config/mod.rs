//! Configuration layer for imageroller.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`RunArgs`])
//! - TOML file parsing ([`ConfigFile`], [`AuthFile`])
//! - Credential validation ([`Credentials`])
//! - Global and per-server resolution ([`GlobalConfig`], [`ServerConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Template generation ([`write_default_configs`])
//! - Default values ([`defaults`])
//!
//! # Files
//!
//! Two files are read. The credential file holds a single `[AUTH]` section
//! with `ApiUser` and `ApiKey`. The configuration file holds a `[DEFAULT]`
//! section and one section per server:
//!
//! ```toml
//! [DEFAULT]
//! ConcurrentWorkers = 4
//! SaveTimeoutMinutes = 60
//! RetainImageMinutes = 1440
//!
//! ["web.example.com"]
//! Enabled = true
//! Region = "DFW"
//! ```
//!
//! # Priority
//!
//! For `SaveTimeoutMinutes`, `RetainImageMinutes` and `Region`:
//!
//! 1. **Server section** - the value in the server's own section
//! 2. **`[DEFAULT]`** - the global default
//!
//! Blank values are treated as absent. A field missing from both is an
//! error naming the server and the field.
//!
//! `ConcurrentWorkers` is global-only: it is read from `[DEFAULT]` and
//! ignored in server sections.
//!
//! # Enablement
//!
//! A server runs if its section sets `Enabled = true`, or if it is named
//! with `--server` (auto-enabled). Naming one server never disables the
//! others.

mod cli;
mod credentials;
pub mod defaults;
mod error;
mod global;
mod server;
mod toml;
mod validated;


pub use cli::{Cli, Command, RunArgs};
pub use credentials::Credentials;
pub use error::{ConfigError, ValueError, field};
pub use global::{GlobalConfig, GlobalDefaults};
pub use server::{Enablement, ServerConfig};
pub use toml::{
    AuthFile, AuthSection, ConfigFile, RawValue, Section, default_auth_template,
    default_config_template,
};
pub use validated::{ValidatedConfig, expand_tilde, write_default_configs};
