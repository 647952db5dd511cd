use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{RecoveryError, Result};

pub const DEFAULT_USER_AGENT: &str = "MinecraftProductScraper/1.0";
pub const DEFAULT_CACHE_PATH: &str = "product_cache.json";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:item_cache.db";
pub const DEFAULT_REPORT_PATH: &str = "recovery_report.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash, ready for path joins.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    Json,
    Sqlite,
    None,
}

/// Cache location; an unset `path` means the default of the chosen backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub path: Option<String>,
}

impl CacheConfig {
    pub fn new(backend: CacheBackend, path: impl Into<String>) -> Self {
        Self {
            backend,
            path: Some(path.into()),
        }
    }

    /// Where the backend keeps its data, `None` when caching is off.
    pub fn location(&self) -> Option<&str> {
        let default = match self.backend {
            CacheBackend::Json => DEFAULT_CACHE_PATH,
            CacheBackend::Sqlite => DEFAULT_DATABASE_URL,
            CacheBackend::None => return None,
        };
        Some(self.path.as_deref().unwrap_or(default))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Json,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            jitter_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub primary: EndpointConfig,
    pub fallback: EndpointConfig,
    pub community: EndpointConfig,
    pub user_agent: String,
    pub game_data_path: Option<PathBuf>,
    pub cache: CacheConfig,
    pub throttle: ThrottleConfig,
    pub report_path: PathBuf,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            primary: EndpointConfig::new("https://api.minecraft-items.com/v1", 10),
            fallback: EndpointConfig::new("https://backup-api.minecraft-data.net/v2", 15),
            community: EndpointConfig::new("https://community.minecraft-trading.org/api", 20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            game_data_path: None,
            cache: CacheConfig::default(),
            throttle: ThrottleConfig::default(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl RecoveryConfig {
    /// Reads `path` if given, then applies environment overrides.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RECOVERY_PRIMARY_URL") {
            self.primary.base_url = url;
        }
        if let Some(url) = lookup("RECOVERY_FALLBACK_URL") {
            self.fallback.base_url = url;
        }
        if let Some(url) = lookup("RECOVERY_COMMUNITY_URL") {
            self.community.base_url = url;
        }
        if let Some(path) = lookup("RECOVERY_CACHE_PATH") {
            self.cache.path = Some(path);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.cache.backend = CacheBackend::Sqlite;
            self.cache.path = Some(url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (label, endpoint) in [
            ("primary", &self.primary),
            ("fallback", &self.fallback),
            ("community", &self.community),
        ] {
            if endpoint.base_url.trim().is_empty() {
                return Err(RecoveryError::Config(format!("{} base_url cannot be empty", label)));
            }
            if endpoint.timeout_secs == 0 {
                return Err(RecoveryError::Config(format!("{} timeout_secs must be positive", label)));
            }
        }
        if self.cache.location().is_some_and(|path| path.trim().is_empty()) {
            return Err(RecoveryError::Config("cache path cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle.delay_ms)
    }
}
