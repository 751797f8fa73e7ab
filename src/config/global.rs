//! Global defaults and the aggregated run configuration.

use std::fmt;

use super::cli::RunArgs;
use super::error::{ConfigError, ValueError, field};
use super::server::ServerConfig;
use super::toml::{ConfigFile, RawValue, non_blank};

/// Values from the `[DEFAULT]` section.
///
/// `concurrent_workers` is validated on construction. The remaining values
/// are defaults for the server sections and are only checked once a server
/// falls back to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDefaults {
    concurrent_workers: u32,
    save_timeout_minutes: Option<RawValue>,
    retain_image_minutes: Option<RawValue>,
    region: Option<RawValue>,
}

impl GlobalDefaults {
    /// Reads the `[DEFAULT]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `[DEFAULT]` or its `ConcurrentWorkers` is absent (or blank)
    /// - `ConcurrentWorkers` is not an integer, or is not greater than 0
    pub fn from_raw(config: &ConfigFile) -> Result<Self, ConfigError> {
        let section = config
            .defaults()
            .ok_or(ConfigError::MissingConcurrentWorkers)?;

        let workers = non_blank(section.concurrent_workers.as_ref())
            .ok_or(ConfigError::MissingConcurrentWorkers)?
            .to_integer(field::CONCURRENT_WORKERS)?;

        if workers <= 0 {
            return Err(ValueError::NonPositiveWorkers.into());
        }

        let concurrent_workers = u32::try_from(workers).map_err(|_| ValueError::OutOfRange {
            field: field::CONCURRENT_WORKERS,
            value: workers,
        })?;

        Ok(Self {
            concurrent_workers,
            save_timeout_minutes: section.save_timeout_minutes.clone(),
            retain_image_minutes: section.retain_image_minutes.clone(),
            region: section.region.clone(),
        })
    }

    /// Number of servers processed in parallel.
    #[must_use]
    pub const fn concurrent_workers(&self) -> u32 {
        self.concurrent_workers
    }

    /// Default `SaveTimeoutMinutes`, as written.
    #[must_use]
    pub const fn save_timeout_minutes(&self) -> Option<&RawValue> {
        self.save_timeout_minutes.as_ref()
    }

    /// Default `RetainImageMinutes`, as written.
    #[must_use]
    pub const fn retain_image_minutes(&self) -> Option<&RawValue> {
        self.retain_image_minutes.as_ref()
    }

    /// Default `Region`, as written.
    #[must_use]
    pub const fn region(&self) -> Option<&RawValue> {
        self.region.as_ref()
    }
}

/// Resolved configuration for a run: the worker count and the enabled
/// servers in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    concurrent_workers: u32,
    servers: Vec<ServerConfig>,
}

impl fmt::Display for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.servers.iter().map(ServerConfig::name).collect();
        write!(
            f,
            "concurrent_workers: {}, servers: [{}]",
            self.concurrent_workers,
            names.join(", ")
        )
    }
}

impl GlobalConfig {
    /// Resolves the whole configuration file.
    ///
    /// Checks run in a fixed order so the same input always reports the
    /// same error:
    /// 1. `[DEFAULT]` and `ConcurrentWorkers`
    /// 2. The `--server` name, if any, names a section
    /// 3. At least one server section exists
    /// 4. Every server section resolves, enabled or not
    /// 5. At least one server is enabled
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn from_raw(args: &RunArgs, config: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = GlobalDefaults::from_raw(config)?;

        if let Some(requested) = args.server.as_deref().filter(|name| !config.has_server(name)) {
            return Err(ConfigError::ServerNotConfigured(requested.to_string()));
        }

        if config.server_count() == 0 {
            return Err(ConfigError::NoServers);
        }

        let mut servers = Vec::with_capacity(config.server_count());
        for (name, section) in config.servers() {
            let server = ServerConfig::resolve(name, section, &defaults, args)?;
            if server.enabled() {
                servers.push(server);
            } else {
                tracing::debug!("Skipping disabled server {name}");
            }
        }

        if servers.is_empty() {
            return Err(ConfigError::NoServers);
        }

        Ok(Self {
            concurrent_workers: defaults.concurrent_workers(),
            servers,
        })
    }

    /// Number of servers processed in parallel.
    #[must_use]
    pub const fn concurrent_workers(&self) -> u32 {
        self.concurrent_workers
    }

    /// Enabled servers in declaration order.
    #[must_use]
    pub fn servers(&self) -> &[ServerConfig] {
        &self.servers
    }

    /// Looks up an enabled server by name.
    #[must_use]
    pub fn server(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.name() == name)
    }
}
