//! API credentials read from the `[AUTH]` section of the credential file.

use std::fmt;

use super::error::{ConfigError, field};
use super::toml::{AuthFile, RawValue, non_blank};

/// Account name and API key for the cloud API.
///
/// Immutable once read. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validates the parsed credential file.
    ///
    /// Values are returned exactly as written; whitespace only matters for
    /// deciding whether a value is blank.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There is no `[AUTH]` section
    /// - `ApiUser` is absent or blank
    /// - `ApiKey` is absent or blank
    pub fn from_raw(auth: &AuthFile) -> Result<Self, ConfigError> {
        let section = auth.auth.as_ref().ok_or(ConfigError::MissingAuthSection)?;

        let user = required(section.api_user.as_ref(), field::API_USER)?;
        let key = required(section.api_key.as_ref(), field::API_KEY)?;

        Ok(Self { user, key })
    }

    /// Account name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consumes the credentials, returning `(user, key)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.user, self.key)
    }
}

fn required(value: Option<&RawValue>, name: &'static str) -> Result<String, ConfigError> {
    non_blank(value)
        .map(ToString::to_string)
        .ok_or(ConfigError::MissingAuthField { field: name })
}
