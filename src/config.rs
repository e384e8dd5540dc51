use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::taskpane::insert::AssetResolution;
use crate::taskpane::search::SearchStrategy;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SlidepaneConfig {
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub insert: InsertConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Public (anonymous) key used by the task pane.
    pub anon_key: String,
    /// Service-role key, only needed by the maintenance commands.
    pub service_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    pub debounce_ms: u64,
    /// Sent instead of an empty query when filters are active.
    pub placeholder_query: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InsertConfig {
    pub asset_resolution: AssetResolution,
    /// Legacy public asset URL; `{id}` is replaced with the slide id.
    pub public_url_template: String,
    pub status_clear_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub slides_bucket: String,
    pub thumbnails_bucket: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub log_level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            service_key: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::RemoteSemantic,
            debounce_ms: 500,
            placeholder_query: "slide".into(),
        }
    }
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            asset_resolution: AssetResolution::SignedUrl,
            public_url_template: String::new(),
            status_clear_ms: 2000,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "text-embedding-3-small".into(),
            api_url: "https://api.openai.com/v1/embeddings".into(),
            api_key: String::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slides_bucket: "slides".into(),
            thumbnails_bucket: "thumbnails".into(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl InsertConfig {
    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.status_clear_ms)
    }
}

/// Returns `~/.slidepane/`
pub fn default_slidepane_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".slidepane")
}

/// Returns the default config file path: `~/.slidepane/config.toml`
pub fn default_config_path() -> PathBuf {
    default_slidepane_dir().join("config.toml")
}

impl SlidepaneConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SlidepaneConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (SUPABASE_URL, SUPABASE_ANON_KEY,
    /// SUPABASE_SERVICE_KEY, OPENAI_API_KEY, SLIDEPANE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SUPABASE_URL") {
            self.backend.url = val;
        }
        if let Ok(val) = std::env::var("SUPABASE_ANON_KEY") {
            self.backend.anon_key = val;
        }
        if let Ok(val) = std::env::var("SUPABASE_SERVICE_KEY") {
            self.backend.service_key = val;
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.embedding.api_key = val;
        }
        if let Ok(val) = std::env::var("SLIDEPANE_LOG_LEVEL") {
            self.log.log_level = val;
        }
    }

    /// Fail early with a readable message when the backend is not configured.
    pub fn require_backend(&self) -> Result<()> {
        anyhow::ensure!(
            !self.backend.url.is_empty(),
            "backend URL is not set. Set SUPABASE_URL or [backend] url in the config file."
        );
        Ok(())
    }
}
