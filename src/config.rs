//! Configuration management for the resume lens client

use crate::client::endpoint::{Endpoint, DEFAULT_ORIGIN};
use crate::error::{Result, ResumeLensError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that supplies the analysis service base URL.
pub const API_URL_ENV: &str = "RESUME_LENS_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the analysis service. When unset, requests go to `origin`.
    pub base_url: Option<String>,
    pub origin: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use.
    pub fn load_or_init(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeLensError::Configuration(format!("Failed to parse config: {}", e)))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeLensError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-lens")
            .join("config.toml")
    }

    /// Apply the base URL from the environment, if set and non-blank.
    pub fn with_env(self) -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        self.with_base_url_override(value)
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            debug!("Using analysis service base URL override: {}", url);
            self.api.base_url = Some(url);
        }
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::resolve(self.api.base_url.as_deref(), &self.api.origin)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    /// Set a value by dotted key, e.g. `api.timeout_ms`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                self.api.base_url = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.trim().to_string())
                };
            }
            "api.origin" => self.api.origin = value.trim().to_string(),
            "api.timeout_ms" => {
                self.api.timeout_ms = value.parse().map_err(|_| {
                    ResumeLensError::Configuration(format!("Invalid timeout: {}", value))
                })?;
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(ResumeLensError::Configuration)?;
            }
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|_| {
                    ResumeLensError::Configuration(format!("Expected true or false, got: {}", value))
                })?;
            }
            _ => {
                return Err(ResumeLensError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}
