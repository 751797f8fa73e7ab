//! Per-server configuration resolved from one server section.

use std::fmt;
use std::time::Duration;

use super::cli::RunArgs;
use super::defaults::{self, SECONDS_PER_MINUTE};
use super::error::{ConfigError, ValueError, field};
use super::global::GlobalDefaults;
use super::toml::{RawValue, Section, non_blank};

/// How a server came to be enabled (or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enablement {
    /// Not enabled in its section and not requested with `--server`.
    Disabled,
    /// `Enabled = true` in its section.
    Configured,
    /// Requested with `--server`; wins over the section's own setting.
    Targeted,
}

/// Fully resolved configuration for one server.
///
/// Every field has been merged from the section and the global defaults
/// and validated. Second-based values are computed from the stored
/// minutes on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    name: String,
    save_timeout_minutes: u32,
    retain_image_minutes: u32,
    region: String,
    enablement: Enablement,
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{ region: {}, save_timeout: {}m, retain_image: {}m, enabled: {}{} }}",
            self.name,
            self.region,
            self.save_timeout_minutes,
            self.retain_image_minutes,
            self.enabled(),
            if self.auto_enabled() { " (auto)" } else { "" },
        )
    }
}

impl ServerConfig {
    /// Resolves one server section against the global defaults.
    ///
    /// Each of `SaveTimeoutMinutes`, `RetainImageMinutes` and `Region` is
    /// taken from the section if set and non-blank, otherwise from the
    /// global default. Presence of all three is checked, in that order,
    /// before any value is converted. A section-local `ConcurrentWorkers`
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field is missing from both the section and the defaults
    /// - A minutes value is not a positive integer
    /// - `Enabled` is not a boolean (only checked when not targeted)
    pub fn resolve(
        name: &str,
        section: &Section,
        defaults: &GlobalDefaults,
        args: &RunArgs,
    ) -> Result<Self, ConfigError> {
        if section.concurrent_workers.is_some() {
            tracing::warn!(
                "{} is a global setting; ignoring it in [{name}]",
                field::CONCURRENT_WORKERS
            );
        }

        let save_timeout = inherit(
            section.save_timeout_minutes.as_ref(),
            defaults.save_timeout_minutes(),
        )
        .ok_or_else(|| ConfigError::server_missing(name, field::SAVE_TIMEOUT_MINUTES))?;

        let retain_image = inherit(
            section.retain_image_minutes.as_ref(),
            defaults.retain_image_minutes(),
        )
        .ok_or_else(|| ConfigError::server_missing(name, field::RETAIN_IMAGE_MINUTES))?;

        let region = inherit(section.region.as_ref(), defaults.region())
            .ok_or_else(|| ConfigError::server_missing(name, field::REGION))?;

        Ok(Self {
            name: name.to_string(),
            save_timeout_minutes: positive_minutes(save_timeout, name, field::SAVE_TIMEOUT_MINUTES)?,
            retain_image_minutes: positive_minutes(retain_image, name, field::RETAIN_IMAGE_MINUTES)?,
            region: region.to_string(),
            enablement: resolve_enablement(name, section, args)?,
        })
    }

    /// Section name of the server.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cloud region of the server.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Minutes before a pending image save is considered stuck.
    #[must_use]
    pub const fn save_timeout_minutes(&self) -> u32 {
        self.save_timeout_minutes
    }

    /// Minutes after which an image may be pruned.
    #[must_use]
    pub const fn retain_image_minutes(&self) -> u32 {
        self.retain_image_minutes
    }

    /// [`Self::save_timeout_minutes`] in seconds.
    #[must_use]
    pub fn save_timeout_seconds(&self) -> u64 {
        u64::from(self.save_timeout_minutes) * SECONDS_PER_MINUTE
    }

    /// [`Self::retain_image_minutes`] in seconds.
    #[must_use]
    pub fn retain_image_seconds(&self) -> u64 {
        u64::from(self.retain_image_minutes) * SECONDS_PER_MINUTE
    }

    /// Save timeout as a [`Duration`].
    #[must_use]
    pub fn save_timeout(&self) -> Duration {
        Duration::from_secs(self.save_timeout_seconds())
    }

    /// Retention window as a [`Duration`].
    #[must_use]
    pub fn retain_image(&self) -> Duration {
        Duration::from_secs(self.retain_image_seconds())
    }

    /// How the server was enabled.
    #[must_use]
    pub const fn enablement(&self) -> Enablement {
        self.enablement
    }

    /// Whether the server takes part in this run.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        !matches!(self.enablement, Enablement::Disabled)
    }

    /// Whether the server is enabled only because `--server` named it.
    #[must_use]
    pub const fn auto_enabled(&self) -> bool {
        matches!(self.enablement, Enablement::Targeted)
    }
}

/// Section value if set and non-blank, else the global default.
fn inherit<'a>(local: Option<&'a RawValue>, global: Option<&'a RawValue>) -> Option<&'a RawValue> {
    non_blank(local).or_else(|| non_blank(global))
}

fn positive_minutes(
    value: &RawValue,
    server: &str,
    name: &'static str,
) -> Result<u32, ValueError> {
    let minutes = value.to_integer(name)?;
    if minutes <= 0 {
        return Err(ValueError::NotPositive {
            server: server.to_string(),
            field: name,
        });
    }

    u32::try_from(minutes).map_err(|_| ValueError::OutOfRange {
        field: name,
        value: minutes,
    })
}

fn resolve_enablement(
    name: &str,
    section: &Section,
    args: &RunArgs,
) -> Result<Enablement, ValueError> {
    if args.targets(name) {
        tracing::debug!("Server {name} enabled by --server");
        return Ok(Enablement::Targeted);
    }

    let enabled = non_blank(section.enabled.as_ref())
        .map_or(Ok(defaults::ENABLED), |value| value.to_boolean(field::ENABLED))?;

    Ok(if enabled {
        Enablement::Configured
    } else {
        Enablement::Disabled
    })
}
