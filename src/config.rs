use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::core::llm::DEFAULT_BASE_URL;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Você é um assistente financeiro especializado em análise de gastos.";
pub const DEFAULT_USER_PROMPT: &str =
    "Analise os seguintes gastos mensais e forneça um resumo detalhado, incluindo categorias \
     de gastos, valores totais e sugestões para economia:";

/// Prefix for environment overrides, e.g. `EXPENSE_ANALYST_LLM__MODEL`.
const ENV_PREFIX: &str = "EXPENSE_ANALYST_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub llm: LlmConfig,
    pub export: ExportConfig,
    pub data: DataConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Completion API settings and the session's starting prompts.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Model selected when a session starts.
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    /// Completion token limit; unset leaves it to the API.
    pub max_tokens: Option<u32>,
    pub organization_id: Option<String>,
    /// Unset means requests wait until the API answers or errors.
    pub request_timeout_secs: Option<u64>,
    /// Prefer the environment or keyring; accepted here for local setups.
    pub api_key: Option<String>,
}

/// Where the downloadable analysis is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Defaults to the working directory.
    pub dir: Option<PathBuf>,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
            max_tokens: None,
            organization_id: None,
            request_timeout_secs: None,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("organization_id", &self.organization_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_secs.map(std::time::Duration::from_secs)
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/expense-analyst/config.toml` plus
    /// environment overrides. Falls back to defaults if the file is unusable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Same as [`AppConfig::load`] with an explicit file path.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => {
                if path.exists() {
                    log::info!("Loaded config from {}", path.display());
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                }
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to parse config at {}: {e}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Layer defaults, the TOML file (if present) and the environment.
    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("expense-analyst"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Directory the analysis download is written to.
    pub fn export_dir(&self) -> PathBuf {
        self.export.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("expense-analyst").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
