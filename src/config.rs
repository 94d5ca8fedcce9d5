//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API endpoint, API key, and last used username.
//!
//! Configuration is stored at `~/.config/shopkeep/config.json`. The
//! `SHOPKEEP_API_URL` and `SHOPKEEP_API_KEY` environment variables
//! override the stored values when set.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "shopkeep";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config: Self = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("SHOPKEEP_API_URL") {
            config.api_url = Some(url);
        }
        if let Ok(key) = std::env::var("SHOPKEEP_API_KEY") {
            config.api_key = Some(key);
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Directory for durable state (config file, session blob). Unlike the
    /// cache directory this is never purged by the OS.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_lives_outside_the_cache_dir() {
        let config_dir = Config::config_dir().expect("config dir");
        let cache_dir = Config::default().cache_dir().expect("cache dir");
        assert!(config_dir.ends_with(APP_NAME));
        assert_ne!(config_dir, cache_dir);
    }
}
