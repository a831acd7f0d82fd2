//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//! - Let transports override individual values explicitly.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; validation of values happens at use sites
//!   (`init_logging`, `open_db`).

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "USER_REGISTRY_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "USER_REGISTRY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "USER_REGISTRY_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "user_registry.sqlite3";

/// Resolved registry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// SQLite file; `None` falls back to the temp directory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Resolves settings from `USER_REGISTRY_*` process environment values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: non_blank(ENV_DB_PATH).map(PathBuf::from),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Replaces the database path when `path` is set.
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.db_path = path;
        }
        self
    }

    /// Replaces the log level when `level` is set.
    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.log_level = level;
        }
        self
    }

    /// Replaces the log directory when `dir` is set.
    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.log_dir = dir;
        }
        self
    }

    /// Database file to open.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::{RegistryConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "   "),
            (ENV_LOG_LEVEL, ""),
        ]));
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_level, default_log_level());
        assert!(config
            .resolved_db_path()
            .ends_with("user_registry.sqlite3"));
    }

    #[test]
    fn environment_values_are_trimmed() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/users.db "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/users"),
        ]));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/users.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/users")));
    }

    #[test]
    fn explicit_overrides_win_only_when_set() {
        let config = RegistryConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "warn")]))
            .with_log_level(None)
            .with_db_path(Some(PathBuf::from("/data/users.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.resolved_db_path(), PathBuf::from("/data/users.db"));
    }
}
