//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands,
//! and the [`RunArgs`] subset handed to configuration resolution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// imageroller: cloud server image rotation
///
/// Snapshots the configured servers and prunes images older than
/// their retention window.
#[derive(Debug, Parser)]
#[command(name = "imageroller")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file (default: ~/.imageroller/config.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Path to credential file (default: ~/.imageroller/auth.toml)
    #[arg(long = "auth-config", short = 'a')]
    pub auth_config: Option<PathBuf>,

    /// Enable this server for the run even if its section does not
    #[arg(long, short)]
    pub server: Option<String>,

    /// Force image rotation
    #[arg(long, short)]
    pub force: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for imageroller
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate configuration and credential file templates
    Init {
        /// Directory to write config.toml and auth.toml into
        #[arg(long = "output-dir", short, default_value = ".")]
        output_dir: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}

/// Command-line values that take part in configuration resolution.
///
/// Passed explicitly into the resolvers so they never read process state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Server requested with `--server`, if any.
    pub server: Option<String>,

    /// `--force`; not interpreted here, only carried to the rotation step.
    pub force: bool,
}

impl RunArgs {
    /// Creates arguments with no server filter and `force` off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested server.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the force flag.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Returns `true` if `name` is the server requested on the command line.
    #[must_use]
    pub fn targets(&self, name: &str) -> bool {
        self.server.as_deref() == Some(name)
    }
}

impl From<&Cli> for RunArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            server: cli.server.clone(),
            force: cli.force,
        }
    }
}
