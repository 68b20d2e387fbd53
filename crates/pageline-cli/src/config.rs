//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pageline_core::RetryPolicy;
use serde::Deserialize;

/// Global configuration for pageline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_path: String,
    pub page_size: usize,
    pub max_retries: u32,
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Backoff unit in milliseconds (retry k sleeps unit * 2^k)
    pub retry_base_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gateway.marvel.com".to_string(),
            api_path: "/v1/public/characters".to_string(),
            page_size: 100,
            max_retries: 3,
            timeout: 10,
            retry_base_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub ts: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub public_key: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub private_key: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub hash: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            ts: "1".to_string(),
            public_key: std::env::var("MARVEL_PUBLIC_KEY").ok(),
            private_key: std::env::var("MARVEL_PRIVATE_KEY").ok(),
            hash: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub raw_file: String,
    pub transformed_file: String,
    pub format: String,
    pub compression_level: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            raw_file: "characters_raw.jsonl".to_string(),
            transformed_file: "characters".to_string(),
            format: "csv".to_string(),
            compression_level: 3,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./pageline.toml (current directory)
    /// 2. ~/.config/pageline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("pageline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "pageline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn raw_path(&self) -> PathBuf {
        self.output.data_dir.join(&self.output.raw_file)
    }

    /// Extraction stage settings
    pub fn extract_config(&self) -> pageline_extract::Config {
        pageline_extract::Config {
            base_url: self.api.base_url.clone(),
            api_path: self.api.api_path.clone(),
            page_size: self.api.page_size,
            retry: RetryPolicy {
                max_retries: self.api.max_retries,
                base_delay: Duration::from_millis(self.api.retry_base_ms),
            },
            timeout: Duration::from_secs(self.api.timeout),
            credentials: pageline_extract::Credentials {
                ts: self.auth.ts.clone(),
                public_key: self.auth.public_key.clone().unwrap_or_default(),
                private_key: self.auth.private_key.clone(),
                hash: self.auth.hash.clone(),
            },
            raw_path: self.raw_path(),
        }
    }

    /// Transformation stage settings
    pub fn transform_config(&self) -> pageline_transform::Config {
        pageline_transform::Config {
            raw_path: self.raw_path(),
            data_dir: self.output.data_dir.clone(),
            transformed_file: self.output.transformed_file.clone(),
            format: self.output.format.clone(),
            zstd_level: self.output.compression_level,
        }
    }
}
