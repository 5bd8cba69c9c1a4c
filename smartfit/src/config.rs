//! Configuration loading for smartfit
//!
//! Configuration is loaded from:
//! 1. Environment variables SMARTFIT_API_URL, NEWS_API_URL, NEWS_API_KEY
//! 2. Environment variable SMARTFIT_CONFIG_PATH
//! 3. ~/.smartfit/config.toml
//! 4. Default values

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::request::{ANONYMOUS_USER, DEFAULT_CLOTHING_TYPE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Prediction backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// News search configuration
    #[serde(default)]
    pub news: NewsConfig,
    /// Defaults applied to scan requests
    #[serde(default)]
    pub request: RequestDefaults,
}

/// Prediction backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the prediction service
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    /// TCP/TLS connect budget in seconds
    #[serde(default = "default_timeout")]
    pub connect_timeout_seconds: u64,
    /// Response read budget in seconds
    #[serde(default = "default_timeout")]
    pub read_timeout_seconds: u64,
    /// Request body upload budget in seconds
    #[serde(default = "default_timeout")]
    pub write_timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// News search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Base URL of the news search API
    #[serde(default = "default_news_url")]
    pub base_url: String,
    /// API key (empty = news disabled)
    #[serde(default)]
    pub api_key: String,
    /// Default search query
    #[serde(default = "default_news_query")]
    pub query: String,
    /// Default sort order
    #[serde(default = "default_news_sort")]
    pub sort_by: String,
    /// How many days back the default search window reaches
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

/// Defaults for scan requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDefaults {
    /// User id sent when no identity is available
    #[serde(default = "default_user_id")]
    pub default_user_id: String,
    /// Clothing type tag sent when none is chosen
    #[serde(default = "default_clothing_type")]
    pub default_clothing_type: String,
}

// Default value functions
fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("smartfit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_news_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_news_query() -> String {
    "fashion".to_string()
}

fn default_news_sort() -> String {
    "relevance".to_string()
}

fn default_lookback_days() -> u32 {
    20
}

fn default_user_id() -> String {
    ANONYMOUS_USER.to_string()
}

fn default_clothing_type() -> String {
    DEFAULT_CLOTHING_TYPE.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            connect_timeout_seconds: default_timeout(),
            read_timeout_seconds: default_timeout(),
            write_timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl BackendConfig {
    /// Backend config pointing at `base_url` with default timeouts
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }

    /// Overall per-request deadline: every phase gets its full budget
    pub fn request_deadline(&self) -> Duration {
        self.connect_timeout() + self.write_timeout() + self.read_timeout()
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_url(),
            api_key: String::new(),
            query: default_news_query(),
            sort_by: default_news_sort(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl NewsConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            default_user_id: default_user_id(),
            default_clothing_type: default_clothing_type(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path().as_deref())
    }

    /// Load configuration from an explicit path (if any), then apply env overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            }
            Some(path) => {
                tracing::info!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment variables take priority over the file
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SMARTFIT_API_URL") {
            self.backend.base_url = url;
        }
        if let Ok(url) = std::env::var("NEWS_API_URL") {
            self.news.base_url = url;
        }
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.news.api_key = key;
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("SMARTFIT_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.smartfit/config.toml
        dirs::home_dir().map(|home| home.join(".smartfit").join("config.toml"))
    }
}
