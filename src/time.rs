//! Time abstraction for testability.
//!
//! Retention decisions compare image timestamps against "now". The
//! [`Clock`] trait lets tests pin "now" while production reads the system
//! clock.

use std::time::{Duration, SystemTime};

/// Source of the current time.
///
/// # Example
///
/// ```
/// use imageroller::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock frozen at a single instant, for tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FixedClock(pub SystemTime);

#[cfg(test)]
impl FixedClock {
    /// Clock frozen `secs` seconds after the Unix epoch.
    pub(crate) fn from_unix_secs(secs: u64) -> Self {
        Self(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Time elapsed from `earlier` to `now`.
///
/// Returns `None` if `earlier` lies after `now` (clock skew between the
/// cloud API and this host).
#[must_use]
pub fn elapsed_between(earlier: SystemTime, now: SystemTime) -> Option<Duration> {
    now.duration_since(earlier).ok()
}
