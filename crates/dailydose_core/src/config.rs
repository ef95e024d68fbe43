//! Runtime configuration.
//!
//! Resolution order (later wins):
//! 1. Built-in defaults.
//! 2. JSON file passed to `DailyDoseConfig::from_json_file`.
//! 3. `DAILYDOSE_*` environment variables via `apply_env_overrides`.
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `api_base_url` | `DAILYDOSE_API_BASE_URL` | `https://zenquotes.io/api/` |
//! | `request_timeout_secs` | `DAILYDOSE_TIMEOUT_SECS` | `15` |
//! | `db_path` | `DAILYDOSE_DB_PATH` | unset (caller decides) |
//! | `log_level` | `DAILYDOSE_LOG_LEVEL` | `debug` / `info` by build mode |
//! | `log_dir` | `DAILYDOSE_LOG_DIR` | unset (logging disabled) |

use crate::logging::default_log_level;
use crate::source::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "DAILYDOSE_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DAILYDOSE_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "DAILYDOSE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DAILYDOSE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAILYDOSE_LOG_DIR";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Settings shared by the CLI and embedding applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyDoseConfig {
    /// Base URL of the remote quote API; `today` is appended.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// SQLite database file.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for DailyDoseConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl DailyDoseConfig {
    /// Loads a config file; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `DAILYDOSE_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup (used by tests).
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = non_empty(lookup(ENV_API_BASE_URL)) {
            self.api_base_url = value;
        }
        if let Some(value) = non_empty(lookup(ENV_TIMEOUT_SECS)) {
            self.request_timeout_secs = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: value.clone(),
            })?;
        }
        if let Some(value) = non_empty(lookup(ENV_DB_PATH)) {
            self.db_path = Some(PathBuf::from(value));
        }
        if let Some(value) = non_empty(lookup(ENV_LOG_LEVEL)) {
            self.log_level = value;
        }
        if let Some(value) = non_empty(lookup(ENV_LOG_DIR)) {
            self.log_dir = Some(PathBuf::from(value));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DailyDoseConfig, ENV_API_BASE_URL, ENV_DB_PATH, ENV_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn defaults_point_at_public_api() {
        let config = DailyDoseConfig::default();
        assert_eq!(config.api_base_url, "https://zenquotes.io/api/");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(config.db_path.is_none());
    }

    #[test]
    fn json_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"request_timeout_secs": 3, "db_path": "/tmp/q.db"}}"#).unwrap();

        let config = DailyDoseConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/q.db")));
        assert_eq!(config.api_base_url, "https://zenquotes.io/api/");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_BASE_URL, "http://localhost:9000/api"),
            (ENV_DB_PATH, "   "),
        ]);
        let config = DailyDoseConfig::default()
            .apply_overrides(|key| env.get(key).map(|value| value.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = DailyDoseConfig::default()
            .apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_TIMEOUT_SECS));
    }
}
