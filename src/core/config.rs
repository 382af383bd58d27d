//! Configuration management

use std::path::PathBuf;
use tracing::warn;

use crate::core::errors::{Result, TranslationError};

/// Configuration for translator and dataset components
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub api_token: String,
    pub inference_base_url: String,
    pub catalog_base_url: String,
    pub cache_dir: PathBuf,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_token: std::env::var("HF_API_TOKEN").unwrap_or_default(),
            inference_base_url: std::env::var("HF_INFERENCE_URL")
                .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string()),
            catalog_base_url: std::env::var("DATASETS_SERVER_URL")
                .unwrap_or_else(|_| "https://datasets-server.huggingface.co".to_string()),
            cache_dir: PathBuf::from(
                std::env::var("DATASET_CACHE_DIR").unwrap_or_else(|_| ".dataset_cache".to_string()),
            ),
            max_attempts: 3,
            retry_delay_ms: 5000,
            timeout_ms: 30000,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = std::env::var("HF_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("HF_API_TOKEN environment variable is required"))?;

        let inference_base_url = std::env::var("HF_INFERENCE_URL")
            .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string());

        let catalog_base_url = std::env::var("DATASETS_SERVER_URL")
            .unwrap_or_else(|_| "https://datasets-server.huggingface.co".to_string());

        let cache_dir = PathBuf::from(
            std::env::var("DATASET_CACHE_DIR").unwrap_or_else(|_| ".dataset_cache".to_string()),
        );

        let max_attempts = std::env::var("MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()?;

        let retry_delay_ms = std::env::var("RETRY_DELAY_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()?;

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api_token,
            inference_base_url,
            catalog_base_url,
            cache_dir,
            max_attempts,
            retry_delay_ms,
            timeout_ms,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(TranslationError::MissingCredential {
                variable: "HF_API_TOKEN".to_string(),
            });
        }

        if self.inference_base_url.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "inference base URL is required".to_string(),
            });
        }

        if self.catalog_base_url.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "catalog base URL is required".to_string(),
            });
        }

        if self.max_attempts == 0 {
            return Err(TranslationError::ConfigError {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.retry_delay_ms == 0 {
            warn!("retry delay is 0ms, transient failures will be retried immediately");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TranslatorConfig {
        TranslatorConfig {
            api_token: "hf_test".to_string(),
            inference_base_url: "https://test.invalid".to_string(),
            catalog_base_url: "https://catalog.invalid".to_string(),
            cache_dir: PathBuf::from(".dataset_cache"),
            max_attempts: 3,
            retry_delay_ms: 5000,
            timeout_ms: 30000,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_token() {
        let config = TranslatorConfig {
            api_token: String::new(),
            ..test_config()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            TranslationError::MissingCredential { ref variable } if variable == "HF_API_TOKEN"
        ));
    }

    #[test]
    fn test_config_validation_zero_attempts() {
        let config = TranslatorConfig {
            max_attempts: 0,
            ..test_config()
        };

        assert!(config.validate().is_err());
    }
}
