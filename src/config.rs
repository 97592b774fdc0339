use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::cache::EvictionPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub recruiting: RecruitingConfig,

    pub ai: AiConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecruitingConfig {
    pub base_url: String,

    /// Sent as both `User-Agent` and `HH-User-Agent`.
    pub client_identifier: String,

    /// Upper bound for a single upstream call (default: 10)
    pub request_timeout_seconds: u64,

    pub per_page: u32,

    pub oauth_authorize_url: String,

    pub oauth_token_url: String,

    pub client_id: Option<String>,

    #[serde(skip_serializing)]
    pub client_secret: Option<String>,

    pub redirect_uri: Option<String>,
}

impl Default for RecruitingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hh.ru".to_string(),
            client_identifier: "JobSwipe/1.0 (support@jobswipe.app)".to_string(),
            request_timeout_seconds: 10,
            per_page: 20,
            oauth_authorize_url: "https://hh.ru/oauth/authorize".to_string(),
            oauth_token_url: "https://api.hh.ru/token".to_string(),
            client_id: None,
            client_secret: None,
            redirect_uri: None,
        }
    }
}

impl RecruitingConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,

    pub model: String,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub request_timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            request_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window for search results (default: 300 = 5 min)
    pub ttl_seconds: u64,

    pub max_entries: usize,

    pub eviction: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 5 * 60,
            max_entries: 100,
            eviction: EvictionPolicy::Fifo,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "jobswipe".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            recruiting: RecruitingConfig::default(),
            ai: AiConfig::default(),
            cache: CacheConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

const ENV_AI_API_KEY: &str = "JOBSWIPE_AI_API_KEY";
const ENV_HH_CLIENT_ID: &str = "JOBSWIPE_HH_CLIENT_ID";
const ENV_HH_CLIENT_SECRET: &str = "JOBSWIPE_HH_CLIENT_SECRET";

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets are usually kept out of config.toml, so the environment wins.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENV_AI_API_KEY) {
            self.ai.api_key = Some(key);
        }
        if let Ok(id) = std::env::var(ENV_HH_CLIENT_ID) {
            self.recruiting.client_id = Some(id);
        }
        if let Ok(secret) = std::env::var(ENV_HH_CLIENT_SECRET) {
            self.recruiting.client_secret = Some(secret);
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("jobswipe").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".jobswipe").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.recruiting.base_url.is_empty() {
            anyhow::bail!("recruiting.base_url cannot be empty");
        }

        if self.ai.base_url.is_empty() {
            anyhow::bail!("ai.base_url cannot be empty");
        }

        if self.recruiting.per_page == 0 || self.recruiting.per_page > 100 {
            anyhow::bail!("recruiting.per_page must be between 1 and 100");
        }

        if self.recruiting.request_timeout_seconds == 0 || self.ai.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeouts must be > 0");
        }

        if self.cache.max_entries == 0 {
            anyhow::bail!("cache.max_entries must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.cache.eviction, EvictionPolicy::Fifo);
        assert_eq!(config.recruiting.request_timeout_seconds, 10);
        assert_eq!(config.recruiting.base_url, "https://api.hh.ru");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.ai.api_key = Some("secret".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[recruiting]"));
        assert!(toml_str.contains("[cache]"));
        assert!(!toml_str.contains("secret"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            ttl_seconds = 60
            eviction = "lru"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.cache.eviction, EvictionPolicy::Lru);

        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.recruiting.per_page, 20);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.recruiting.per_page = 500;
        assert!(config.validate().is_err());
    }
}
