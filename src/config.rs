use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::agent::ParseMode;
use crate::domain::ToolServerInfo;
use crate::llm::GeminiConfig;
use crate::llm::gemini::{DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::tools::ToolSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub client: ClientConfig,
    pub servers: Vec<ToolServerInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub strict_parsing: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 60000,
            strict_parsing: false,
        }
    }
}

impl LlmConfig {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_parsing {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_ms: u64,
    pub health_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            health_timeout_ms: 2000,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            client: ClientConfig::default(),
            servers: ToolSet::all().iter().map(|t| t.default_server_info()).collect(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Server keys must be unique and every server needs an endpoint
    pub fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for server in &self.servers {
            if server.key.trim().is_empty() {
                bail!("Server '{}' has an empty key", server.name);
            }
            if !keys.insert(server.key.as_str()) {
                bail!("Duplicate server key: {}", server.key);
            }
            if server.url.trim().is_empty() {
                bail!("Server '{}' has no url", server.key);
            }
        }
        Ok(())
    }
}
