//! Configuration management for kfpwd

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest length the generator will ever produce
pub const GENERATOR_FLOOR: i64 = 4;

/// kfpwd configuration, read from `~/.config/kfpwd/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Length used by `create` when none is given
    #[serde(default = "default_length")]
    pub default_length: i64,

    /// Shortest length `create` accepts
    #[serde(default = "default_min_length")]
    pub min_length: i64,

    /// Store file name, resolved next to the executable
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

fn default_length() -> i64 {
    12
}

fn default_min_length() -> i64 {
    6
}

fn default_db_file() -> String {
    "passwords.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_length: default_length(),
            min_length: default_min_length(),
            db_file: default_db_file(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Minimum accepted length, never below the generator floor
    pub fn effective_min_length(&self) -> i64 {
        self.min_length.max(GENERATOR_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let tmp = TempDir::new()?;
        let config = Config::load(&tmp.path().join("config.json"))?;
        assert_eq!(config, Config::default());
        assert_eq!(config.default_length, 12);
        assert_eq!(config.min_length, 6);
        assert_eq!(config.db_file, "passwords.db");
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"default_length": 20}"#)?;

        let config = Config::load(&path)?;
        assert_eq!(config.default_length, 20);
        assert_eq!(config.min_length, 6);
        Ok(())
    }

    #[test]
    fn test_full_file_round_trips() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config.json");
        let config = Config {
            default_length: 16,
            min_length: 8,
            db_file: "vault.db".to_string(),
        };
        std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;
        assert_eq!(Config::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_an_error() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "not json")?;
        assert!(Config::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_min_length_floor() {
        let config = Config {
            min_length: 1,
            ..Config::default()
        };
        assert_eq!(config.effective_min_length(), GENERATOR_FLOOR);
        assert_eq!(Config::default().effective_min_length(), 6);
    }
}
