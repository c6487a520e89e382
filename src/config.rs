//! Configuration for the event explorer client.
//! Layering: config file, then environment variables, then CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search service connection settings
    pub api: ApiConfig,
    /// Interface behavior settings
    pub ui: UiConfig,
}

/// Connection settings for the search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the search service
    pub base_url: Url,
    /// Path of the search endpoint, joined onto the base URL
    pub search_path: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Results requested per page
    pub page_size: u32,
}

/// Interface behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event poll interval in milliseconds
    pub tick_ms: u64,
    /// Settle delay applied to status-filter toggles in milliseconds
    pub filter_delay_ms: u64,
    /// How long transient messages stay on screen, in seconds
    pub toast_ttl_secs: u64,
    /// Directory for the dark-mode state file and the session log.
    /// Defaults to the platform state directory when unset.
    pub state_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000").unwrap(),
            search_path: "/api/search/".to_string(),
            request_timeout_secs: 30,
            page_size: 12,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            filter_delay_ms: 500,
            toast_ttl_secs: 4,
            state_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("EXPLORER_API_URL") {
            self.api.base_url = Url::parse(&url).context("Invalid EXPLORER_API_URL")?;
        }

        if let Ok(path) = std::env::var("EXPLORER_SEARCH_PATH") {
            self.api.search_path = path;
        }

        if let Ok(page_size) = std::env::var("EXPLORER_PAGE_SIZE") {
            self.api.page_size = page_size.parse().context("Invalid EXPLORER_PAGE_SIZE")?;
        }

        if let Ok(dir) = std::env::var("EXPLORER_STATE_DIR") {
            self.ui.state_dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 || self.api.page_size > 100 {
            return Err(anyhow::anyhow!("Page size must be between 1 and 100"));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout cannot be 0"));
        }

        if !self.api.search_path.starts_with('/') {
            return Err(anyhow::anyhow!("Search path must start with '/'"));
        }

        if self.ui.tick_ms == 0 {
            return Err(anyhow::anyhow!("Tick interval cannot be 0"));
        }

        if self.ui.toast_ttl_secs == 0 {
            return Err(anyhow::anyhow!("Toast TTL cannot be 0"));
        }

        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Get poll interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    /// Get filter settle delay as Duration
    pub fn filter_delay(&self) -> Duration {
        Duration::from_millis(self.ui.filter_delay_ms)
    }

    /// Get toast lifetime as Duration
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.ui.toast_ttl_secs)
    }

    /// Directory holding the dark-mode state file and the session log.
    pub fn resolve_state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.ui.state_dir {
            return dir.clone();
        }
        dirs::state_dir()
            .or_else(dirs::data_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("event_explorer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.page_size, 12);
        assert_eq!(config.ui.filter_delay_ms, 500);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[api]
base_url = "http://search.internal:9000"

[ui]
filter_delay_ms = 250
"#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://search.internal:9000/");
        assert_eq!(config.api.page_size, 12);
        assert_eq!(config.ui.filter_delay_ms, 250);
        assert_eq!(config.ui.tick_ms, 100);
    }

    #[test]
    fn out_of_range_page_size_fails_validation() {
        let mut config = Config::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());
        config.api.page_size = 101;
        assert!(config.validate().is_err());
        config.api.page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_search_path_fails_validation() {
        let mut config = Config::default();
        config.api.search_path = "api/search/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        std::env::set_var("EXPLORER_API_URL", "http://flows.example.com:8080");
        std::env::set_var("EXPLORER_PAGE_SIZE", "24");

        let mut config = Config::default();
        config.apply_env().unwrap();

        std::env::remove_var("EXPLORER_API_URL");
        std::env::remove_var("EXPLORER_PAGE_SIZE");

        assert_eq!(
            config.api.base_url.as_str(),
            "http://flows.example.com:8080/"
        );
        assert_eq!(config.api.page_size, 24);
    }

    #[test]
    fn explicit_state_dir_wins() {
        let mut config = Config::default();
        config.ui.state_dir = Some(PathBuf::from("/var/lib/event_explorer"));
        assert_eq!(
            config.resolve_state_dir(),
            PathBuf::from("/var/lib/event_explorer")
        );
    }
}
