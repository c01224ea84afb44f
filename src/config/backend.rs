use crate::core::{EngineError, Result};
use serde::Deserialize;

/// Billing backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(BackendConfig {
            base_url: var("BILLING_API_BASE_URL").ok_or_else(|| {
                EngineError::Configuration("BILLING_API_BASE_URL not set".to_string())
            })?,
            api_key: var("BILLING_API_KEY")
                .ok_or_else(|| EngineError::Configuration("BILLING_API_KEY not set".to_string()))?,
            timeout_secs: var("BILLING_API_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    EngineError::Configuration("Invalid BILLING_API_TIMEOUT_SECS".to_string())
                })?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(EngineError::Configuration(format!(
                "BILLING_API_BASE_URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(EngineError::Configuration(
                "BILLING_API_KEY cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(EngineError::Configuration(
                "Backend timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
