//! Configuration Loader
//!
//! Builds a [`ClientConfig`] from defaults, JSON files and environment variables.

use crate::config::client::{ClientConfig, ConfigOverlay};
use crate::error::{OpenAiError, Result};
use std::path::{Path, PathBuf};

/// Environment variable holding the API token
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the base URL
pub const API_BASE_ENV: &str = "OPENAI_API_BASE";

/// Environment variable pointing at an extra config file
pub const CONFIG_PATH_ENV: &str = "OPENAI_LITE_CONFIG_PATH";

/// Configuration loader with support for multiple sources
pub struct ConfigLoader {
    config: ClientConfig,
}

impl ConfigLoader {
    /// Create a new config loader and load from default locations
    pub fn new() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut loader = Self {
            config: ClientConfig::default(),
        };

        // Later paths override earlier ones
        for path in Self::get_config_paths() {
            if path.exists() {
                loader.load_from_file(&path)?;
            }
        }

        loader.apply_env(|name| std::env::var(name).ok());
        Ok(loader)
    }

    /// Create a loader with a specific config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut loader = Self {
            config: ClientConfig::default(),
        };

        loader.load_from_file(path)?;
        loader.apply_env(|name| std::env::var(name).ok());
        Ok(loader)
    }

    /// Get list of config paths to check, most general first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".openai-lite").join("config.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("openai-lite").join("config.json"));
        }

        paths.push(PathBuf::from("openai-lite.json"));

        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        paths
    }

    /// Load configuration from a specific file
    fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OpenAiError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let overlay: ConfigOverlay = serde_json::from_str(&content).map_err(|e| {
            OpenAiError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded client config");
        self.config.merge(overlay);
        Ok(())
    }

    /// Apply environment overrides through `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.config.merge(ConfigOverlay {
            api_key: lookup(API_KEY_ENV).filter(|v| !v.is_empty()),
            base_url: lookup(API_BASE_ENV).filter(|v| !v.is_empty()),
            ..Default::default()
        });
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> ClientConfig {
        self.config
    }
}
