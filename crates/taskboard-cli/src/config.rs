// File: src/config.rs
// Purpose: Configuration parsing from taskboard.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use taskboard_core::DEFAULT_PAGE_SIZE;
use uuid::Uuid;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// `sqlite:...` or `postgres://...`
    #[serde(default = "default_database_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Who the CLI acts as; unset means signed out
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_database_url() -> String {
    "sqlite:taskboard.db?mode=rwc".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Apply `DATABASE_URL` and `TASKBOARD_USER` from `lookup`
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database.url = url;
        }

        if let Some(user) = lookup("TASKBOARD_USER").filter(|user| !user.trim().is_empty()) {
            let user_id = Uuid::parse_str(user.trim())
                .with_context(|| format!("TASKBOARD_USER is not a user id: {}", user))?;
            self.session.user_id = Some(user_id);
        }

        Ok(self)
    }

    /// Command line flags win over file and environment
    pub fn apply_flags(mut self, database_url: Option<String>, user: Option<Uuid>) -> Self {
        if let Some(url) = database_url {
            self.database.url = url;
        }
        if let Some(user_id) = user {
            self.session.user_id = Some(user_id);
        }
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:taskboard.db?mode=rwc");
        assert_eq!(config.pagination.page_size, 5);
        assert_eq!(config.session.user_id, None);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("does-not-exist/taskboard.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [database]
            url = "postgres://localhost/board"

            [session]
            user_id = "7b0c8a6e-3f57-4d7e-9d38-2f8a5d3c9e11"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.url, "postgres://localhost/board");
        assert_eq!(config.pagination.page_size, 5);
        assert!(config.session.user_id.is_some());
    }

    #[test]
    fn test_env_then_flags() {
        let user = Uuid::new_v4();
        let config = Config::default()
            .apply_env(|key| match key {
                "DATABASE_URL" => Some("sqlite::memory:".to_string()),
                "TASKBOARD_USER" => Some(user.to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.session.user_id, Some(user));

        let config = config.apply_flags(Some("sqlite:other.db".to_string()), None);
        assert_eq!(config.database.url, "sqlite:other.db");
        assert_eq!(config.session.user_id, Some(user));
    }

    #[test]
    fn test_bad_env_user() {
        let result = Config::default().apply_env(|key| {
            (key == "TASKBOARD_USER").then(|| "alice".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
