//! Retention and save-timeout decisions for one server.
//!
//! The cloud API client lists images and performs deletions; this module
//! only decides which images are past their retention window and whether
//! a pending save has run too long.
//!
//! [`RetentionPolicy::expired`], [`RetentionPolicy::is_save_stuck`] and
//! [`ImageRecord`] are the interface for the pruning step that runs per
//! server once the cloud API client has listed its images. Within this
//! crate the rotation plan only reports the policy durations.

use std::time::{Duration, SystemTime};

use crate::config::ServerConfig;
use crate::time::{Clock, elapsed_between};

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;

/// An existing image as reported by the cloud API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Image name
    pub name: String,
    /// Creation time
    pub created_at: SystemTime,
}

impl ImageRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: SystemTime) -> Self {
        Self {
            name: name.into(),
            created_at,
        }
    }
}

/// Retention window and save timeout of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    retain: Duration,
    save_timeout: Duration,
}

impl From<&ServerConfig> for RetentionPolicy {
    fn from(server: &ServerConfig) -> Self {
        Self::new(server.retain_image(), server.save_timeout())
    }
}

impl RetentionPolicy {
    /// Creates a policy from explicit durations.
    #[must_use]
    pub const fn new(retain: Duration, save_timeout: Duration) -> Self {
        Self {
            retain,
            save_timeout,
        }
    }

    /// How long images are kept.
    #[must_use]
    pub const fn retain(&self) -> Duration {
        self.retain
    }

    /// How long a save may stay pending.
    #[must_use]
    pub const fn save_timeout(&self) -> Duration {
        self.save_timeout
    }

    /// Returns `true` if an image created at `created_at` is older than
    /// the retention window. An image exactly at the window is kept, as is
    /// one dated in the future.
    #[must_use]
    pub fn is_expired(&self, created_at: SystemTime, now: SystemTime) -> bool {
        elapsed_between(created_at, now).is_some_and(|age| age > self.retain)
    }

    /// Returns `true` if a save started at `started_at` has been pending
    /// for longer than the save timeout.
    #[must_use]
    pub fn is_save_stuck(&self, started_at: SystemTime, now: SystemTime) -> bool {
        elapsed_between(started_at, now).is_some_and(|pending| pending > self.save_timeout)
    }

    /// Images eligible for pruning, oldest first.
    ///
    /// All images are judged against a single reading of `clock`.
    pub fn expired<'a>(
        &self,
        images: &'a [ImageRecord],
        clock: &impl Clock,
    ) -> Vec<&'a ImageRecord> {
        let now = clock.now();
        let mut expired: Vec<&ImageRecord> = images
            .iter()
            .filter(|image| self.is_expired(image.created_at, now))
            .collect();
        expired.sort_by_key(|image| image.created_at);

        tracing::debug!(
            "{} of {} image(s) past retention of {}s",
            expired.len(),
            images.len(),
            self.retain.as_secs()
        );

        expired
    }
}
