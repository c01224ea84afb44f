use crate::core::{CurrencyRegistry, EngineError, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub mod backend;

pub use backend::BackendConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    /// YAML currency table; the built-in registry is used when unset
    pub currency_registry_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(EngineError::Configuration(format!(
                    "Invalid LOG_FORMAT '{}', expected 'pretty' or 'json'",
                    other
                )))
            }
        };

        let config = Config {
            app: AppConfig {
                env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                log_format,
            },
            backend: BackendConfig::from_vars(&var)?,
            currency_registry_path: var("CURRENCY_REGISTRY_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.backend.validate()
    }

    /// Currency table from the configured file, or the built-in one
    pub fn load_currency_registry(&self) -> Result<CurrencyRegistry> {
        match &self.currency_registry_path {
            Some(path) => CurrencyRegistry::from_yaml_file(path),
            None => Ok(CurrencyRegistry::with_defaults()),
        }
    }
}
