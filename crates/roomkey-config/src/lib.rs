//! Configuration management for roomkey
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the binary)
//! 2. Environment variables (ROOMKEY_* prefix, `__` between section and key)
//! 3. roomkey.local.toml (gitignored, local overrides)
//! 4. roomkey.toml (git-tracked, project config)
//! 5. ~/.config/roomkey/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main roomkey configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomkeyConfig {
    pub policy: PolicyConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Rule table evaluated by every access check.
    pub rules_path: PathBuf,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("rules/access-control.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Users, locations and bookings backing the in-memory stores.
    pub fixtures_path: PathBuf,
    /// Only stays covering this date count as active. Unset means every
    /// stored booking is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fixtures_path: PathBuf::from("fixtures/hotel.json"),
            reference_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl RoomkeyConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.policy.rules_path.is_relative() {
            self.policy.rules_path = base.join(&self.policy.rules_path);
        }

        if self.data.fixtures_path.is_relative() {
            self.data.fixtures_path = base.join(&self.data.fixtures_path);
        }
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.policy.rules_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "policy.rules_path must not be empty".to_string(),
            ));
        }

        if self.data.fixtures_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.fixtures_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML, in the shape the config files use
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoomkeyConfig::default();
        assert_eq!(
            config.policy.rules_path,
            PathBuf::from("rules/access-control.json")
        );
        assert_eq!(config.data.fixtures_path, PathBuf::from("fixtures/hotel.json"));
        assert_eq!(config.data.reference_date, None);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_path_resolution() {
        let mut config = RoomkeyConfig::default();
        config.data.fixtures_path = PathBuf::from("/srv/hotel/fixtures.json");
        config.resolve_paths("/home/user/project");

        assert_eq!(
            config.policy.rules_path,
            PathBuf::from("/home/user/project/rules/access-control.json")
        );
        // Absolute paths are left alone
        assert_eq!(
            config.data.fixtures_path,
            PathBuf::from("/srv/hotel/fixtures.json")
        );
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = RoomkeyConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown log level 'verbose'"));
    }

    #[test]
    fn test_to_toml() {
        let mut config = RoomkeyConfig::default();
        config.data.reference_date = NaiveDate::from_ymd_opt(2025, 12, 5);

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[policy]"));
        assert!(rendered.contains("reference_date = \"2025-12-05\""));

        let parsed: RoomkeyConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
