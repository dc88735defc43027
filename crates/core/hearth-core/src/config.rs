//! Configuration management and environment variable loading

use crate::{HearthError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default model used for every answer-generation call
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default Messages API base URL
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Load environment variables from a .env file
///
/// A missing file is not an error; the process environment is used as-is.
///
/// # Example
///
/// ```no_run
/// use hearth_core::load_env;
///
/// load_env().ok();
/// let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(HearthError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(HearthError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get required environment variable
pub fn get_required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(HearthError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Get an optional environment variable, treating blank values as unset
pub fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Settings for the answer-generation service and the responder
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Anthropic API key
    pub api_key: Option<String>,
    /// Messages API base URL (without `/messages`)
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Token budget for the specialist agents
    pub specialist_max_tokens: usize,
    /// Token budget for the triage agent
    pub triage_max_tokens: usize,
    /// Request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            specialist_max_tokens: 1200,
            triage_max_tokens: 600,
            request_timeout: None,
        }
    }
}

/// Settings for the web UI
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Maximum accepted request body (images arrive inline)
    pub max_body_bytes: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Full process configuration
#[derive(Debug, Clone, Default)]
pub struct HearthConfig {
    /// Model settings
    pub model: ModelConfig,
    /// UI settings
    pub ui: UiConfig,
    /// Optional JSON file overriding the built-in keyword table
    pub keywords_file: Option<PathBuf>,
}

impl HearthConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let model_defaults = ModelConfig::default();
        let ui_defaults = UiConfig::default();

        let model = ModelConfig {
            api_key: get_env_opt("ANTHROPIC_API_KEY"),
            base_url: get_env_or("ANTHROPIC_BASE_URL", &model_defaults.base_url),
            model: get_env_or("ANTHROPIC_MODEL", &model_defaults.model),
            specialist_max_tokens: get_env_int(
                "HEARTH_SPECIALIST_MAX_TOKENS",
                model_defaults.specialist_max_tokens,
            ),
            triage_max_tokens: get_env_int(
                "HEARTH_TRIAGE_MAX_TOKENS",
                model_defaults.triage_max_tokens,
            ),
            request_timeout: get_env_opt("HEARTH_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        let ui = UiConfig {
            host: get_env_or("HEARTH_UI_HOST", &ui_defaults.host),
            port: get_env_int("HEARTH_UI_PORT", ui_defaults.port),
            max_body_bytes: get_env_int("HEARTH_MAX_BODY_BYTES", ui_defaults.max_body_bytes),
        };

        Self {
            model,
            ui,
            keywords_file: get_env_opt("HEARTH_KEYWORDS_FILE").map(PathBuf::from),
        }
    }

    /// The API key, or a config error naming the variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.model.api_key.as_deref().ok_or_else(|| {
            HearthError::config(
                "Required environment variable 'ANTHROPIC_API_KEY' is not set. \
                 Check your .env file or system environment.",
            )
        })
    }
}
