//! TOML configuration file parsing.
//!
//! Both files are parsed into raw sections whose scalar values stay
//! untyped ([`RawValue`]) until resolution, so that presence and value
//! errors can be reported separately and per field.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::defaults::{AUTH_SECTION, DEFAULT_SECTION};
use super::error::{ConfigError, ValueError, field};

/// Path reported for content parsed from memory.
const INLINE_SOURCE: &str = "<inline>";

/// Keys recognised in the configuration file sections.
const SECTION_KEYS: [&str; 5] = [
    field::ENABLED,
    field::CONCURRENT_WORKERS,
    field::SAVE_TIMEOUT_MINUTES,
    field::RETAIN_IMAGE_MINUTES,
    field::REGION,
];

/// Keys recognised in the `[AUTH]` section.
const AUTH_KEYS: [&str; 2] = [field::API_USER, field::API_KEY];

/// A scalar value as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// `true` / `false`
    Boolean(bool),
    /// A bare integer
    Integer(i64),
    /// A quoted string
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl RawValue {
    /// Returns `true` for text that is empty after trimming whitespace.
    ///
    /// Blank values count as absent wherever presence is checked.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// Converts to an integer; quoted integers are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidInteger`] for booleans and for text
    /// that is not an integer.
    pub fn to_integer(&self, field: &'static str) -> Result<i64, ValueError> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Text(s) => s.trim().parse().map_err(|_| ValueError::InvalidInteger {
                field,
                value: s.clone(),
            }),
            Self::Boolean(b) => Err(ValueError::InvalidInteger {
                field,
                value: b.to_string(),
            }),
        }
    }

    /// Converts to a boolean.
    ///
    /// Accepts real booleans, `1`/`0`, and (case-insensitively) the words
    /// `true`/`false`, `yes`/`no`, `on`/`off`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidBoolean`] for anything else.
    pub fn to_boolean(&self, field: &'static str) -> Result<bool, ValueError> {
        let invalid = || ValueError::InvalidBoolean {
            field,
            value: self.to_string(),
        };

        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Integer(1) => Ok(true),
            Self::Integer(0) => Ok(false),
            Self::Integer(_) => Err(invalid()),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "1" | "yes" | "true" | "on" => Ok(true),
                "0" | "no" | "false" | "off" => Ok(false),
                _ => Err(invalid()),
            },
        }
    }
}

/// Returns the value only if it is present and not blank.
pub(crate) fn non_blank(value: Option<&RawValue>) -> Option<&RawValue> {
    value.filter(|v| !v.is_blank())
}

/// Keys read from a configuration section.
///
/// Key names match regardless of case. Unknown keys are ignored with a
/// warning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Section {
    /// Enable switch (server sections only)
    pub enabled: Option<RawValue>,

    /// Worker count (honoured in `[DEFAULT]` only)
    pub concurrent_workers: Option<RawValue>,

    /// Minutes before a pending save is considered stuck
    pub save_timeout_minutes: Option<RawValue>,

    /// Minutes an image is retained before pruning
    pub retain_image_minutes: Option<RawValue>,

    /// Cloud region
    pub region: Option<RawValue>,
}

/// Parsed configuration file: the `[DEFAULT]` section plus server
/// sections in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    defaults: Option<Section>,
    servers: Vec<(String, Section)>,
}

impl ConfigFile {
    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::parse_with_path(&content, path)
    }

    /// Parses the configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a top-level entry is not
    /// a usable section.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_with_path(content, Path::new(INLINE_SOURCE))
    }

    fn parse_with_path(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::default();
        for (name, value) in table {
            let section = parse_section(&name, value)?;
            if name == DEFAULT_SECTION {
                config.defaults = Some(section);
            } else {
                config.servers.push((name, section));
            }
        }

        Ok(config)
    }

    /// The `[DEFAULT]` section, if present.
    #[must_use]
    pub const fn defaults(&self) -> Option<&Section> {
        self.defaults.as_ref()
    }

    /// Server sections in declaration order.
    pub fn servers(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.servers
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }

    /// Returns `true` if a server section with exactly this name exists.
    #[must_use]
    pub fn has_server(&self, name: &str) -> bool {
        self.servers.iter().any(|(n, _)| n == name)
    }

    /// Number of server sections.
    #[must_use]
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }
}

fn parse_section(name: &str, value: toml::Value) -> Result<Section, ConfigError> {
    let table = match value {
        toml::Value::Table(table) => table,
        other => {
            return Err(ConfigError::InvalidSection {
                section: name.to_string(),
                reason: format!(
                    "expected a [section], found a top-level {}; put it under [{DEFAULT_SECTION}]",
                    other.type_str()
                ),
            });
        }
    };

    if let Some((key, value)) = table.iter().find(|(_, v)| v.is_table()) {
        return Err(ConfigError::InvalidSection {
            section: name.to_string(),
            reason: format!(
                "nested table '{key}'; quote server names containing dots, e.g. [\"{}\"]",
                dotted_name(name, key, value)
            ),
        });
    }

    deserialize_section(name, canonical_keys(name, table, &SECTION_KEYS)?)
}

/// Rebuilds the full header of an unquoted dotted name such as
/// `[web.example.com]` from the nested tables TOML made of it.
fn dotted_name(name: &str, key: &str, mut value: &toml::Value) -> String {
    let mut dotted = format!("{name}.{key}");
    while let Some((next, inner)) = value
        .as_table()
        .and_then(|table| table.iter().find(|(_, v)| v.is_table()))
    {
        dotted.push('.');
        dotted.push_str(next);
        value = inner;
    }
    dotted
}

/// Renames known keys to their canonical spelling, matching without regard
/// to case, and drops unknown keys with a warning.
///
/// Two spellings of the same key in one section are rejected.
fn canonical_keys(
    section: &str,
    table: toml::Table,
    known: &[&'static str],
) -> Result<toml::Table, ConfigError> {
    let mut canonical = toml::Table::new();
    for (key, value) in table {
        let Some(name) = known.iter().find(|k| k.eq_ignore_ascii_case(&key)) else {
            tracing::warn!("Ignoring unknown key '{key}' in [{section}]");
            continue;
        };
        if canonical.insert((*name).to_string(), value).is_some() {
            return Err(ConfigError::InvalidSection {
                section: section.to_string(),
                reason: format!("key '{name}' is set more than once"),
            });
        }
    }
    Ok(canonical)
}

fn deserialize_section<T: DeserializeOwned>(
    name: &str,
    table: toml::Table,
) -> Result<T, ConfigError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidSection {
            section: name.to_string(),
            reason: e.to_string().trim().to_string(),
        })
}

/// Parsed credential file.
#[derive(Debug, Default)]
pub struct AuthFile {
    /// The `[AUTH]` section
    pub auth: Option<AuthSection>,
}

/// Keys read from the `[AUTH]` section, matched regardless of case.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthSection {
    /// Account name
    pub api_user: Option<RawValue>,

    /// API key
    pub api_key: Option<RawValue>,
}

impl AuthFile {
    /// Loads the credentials from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::parse_with_path(&content, path)
    }

    /// Parses the credentials from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_with_path(content, Path::new(INLINE_SOURCE))
    }

    fn parse_with_path(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let auth = match table.remove(AUTH_SECTION) {
            None => None,
            Some(toml::Value::Table(section)) => Some(deserialize_section(
                AUTH_SECTION,
                canonical_keys(AUTH_SECTION, section, &AUTH_KEYS)?,
            )?),
            Some(other) => {
                return Err(ConfigError::InvalidSection {
                    section: AUTH_SECTION.to_string(),
                    reason: format!("expected a [section], found a {}", other.type_str()),
                });
            }
        };

        Ok(Self { auth })
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Generates the configuration file template with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# imageroller configuration

# Global values. ConcurrentWorkers is required and can only be set here.
# The other keys are defaults for every server section below.
[DEFAULT]
ConcurrentWorkers = 4

# Minutes before a pending image save is considered stuck
SaveTimeoutMinutes = 60

# Minutes an image is kept before it may be pruned
RetainImageMinutes = 1440

# Cloud region, e.g. "DFW", "ORD", "IAD"
# Region = "DFW"

# One section per server. Quote names that contain dots.
# Any key from [DEFAULT] except ConcurrentWorkers can be overridden here.
["server.example.com"]
# Servers are skipped unless enabled here or named with --server
Enabled = false
Region = "DFW"
# SaveTimeoutMinutes = 30
# RetainImageMinutes = 720
"#
    .to_string()
}

/// Generates the credential file template with comments.
#[must_use]
pub fn default_auth_template() -> String {
    r#"# imageroller credentials
# Keep this file private.

[AUTH]
ApiUser = ""
ApiKey = ""
"#
    .to_string()
}
