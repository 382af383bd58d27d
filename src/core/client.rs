//! Generic translation client with retry logic
//!
//! One [`ProviderClient`] serves every provider; behavior differences live
//! entirely in the [`ProviderConfig`] it is constructed with.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Translation, TranslationRequest};
use crate::core::providers::{builtin_providers, find_provider, ProviderConfig};

/// Retrying HTTP client for one translation provider
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    provider: ProviderConfig,
    config: Arc<TranslatorConfig>,
}

impl ProviderClient {
    /// Create a client for one provider
    pub fn new(provider: ProviderConfig, config: TranslatorConfig) -> Result<Self> {
        config.validate()?;
        let http = build_http(&config)?;

        Ok(Self {
            http,
            provider,
            config: Arc::new(config),
        })
    }

    fn with_http(http: reqwest::Client, provider: ProviderConfig, config: Arc<TranslatorConfig>) -> Self {
        Self {
            http,
            provider,
            config,
        }
    }

    /// Provider this client is bound to
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Translate a single request.
    ///
    /// Transient failures (network, 5xx, 429) are retried up to
    /// `max_attempts` with a fixed delay between attempts; everything else
    /// returns immediately. Requests are issued serially, one in flight.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<Translation> {
        if !self
            .provider
            .supports(&request.source_lang, &request.target_lang)
        {
            return Err(TranslationError::UnsupportedPair {
                provider: self.provider.tag.clone(),
                source: request.source_lang.clone(),
                target: request.target_lang.clone(),
            });
        }

        let mut last_error: Option<TranslationError> = None;

        for attempt in 1..=self.config.max_attempts {
            if attempt > 1 {
                debug!(
                    "Retry attempt {} for provider {}",
                    attempt, self.provider.tag
                );
                sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            }

            match self.send_request(request).await {
                Ok(translation) => {
                    if attempt > 1 {
                        info!(
                            "Provider {} succeeded after {} attempts",
                            self.provider.tag, attempt
                        );
                    }
                    return Ok(translation);
                }
                Err(e) => {
                    warn!(
                        "Provider {} attempt {} failed: {}",
                        self.provider.tag, attempt, e
                    );

                    if !e.is_transient() {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(TranslationError::RetriesExhausted {
            attempts: self.config.max_attempts,
            message: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Send one HTTP request
    async fn send_request(&self, request: &TranslationRequest) -> Result<Translation> {
        let body = self.provider.build_body(request);
        let url = self.provider.endpoint(&self.config.inference_base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            let text = self.provider.extract_text(&json)?;

            Ok(Translation {
                text,
                provider: self.provider.tag.clone(),
            })
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            Err(TranslationError::ApiError {
                status: status_code,
                message: error_text,
            })
        }
    }
}

/// Named collection of providers sharing one HTTP connection pool
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
    config: Arc<TranslatorConfig>,
    http: reqwest::Client,
}

impl ProviderRegistry {
    /// Registry over the built-in provider table
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_providers(config, builtin_providers())
    }

    /// Registry over an explicit provider table
    pub fn with_providers(config: TranslatorConfig, providers: Vec<ProviderConfig>) -> Result<Self> {
        config.validate()?;
        let http = build_http(&config)?;

        Ok(Self {
            providers,
            config: Arc::new(config),
            http,
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(config)
    }

    /// Registered providers
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// Tag of the first registered provider
    pub fn default_tag(&self) -> Option<&str> {
        self.providers.first().map(|p| p.tag.as_str())
    }

    /// Client for the named provider
    pub fn client(&self, name: &str) -> Result<ProviderClient> {
        let provider = find_provider(&self.providers, name)
            .cloned()
            .ok_or_else(|| TranslationError::UnknownProvider {
                name: name.to_string(),
            })?;

        Ok(ProviderClient::with_http(
            self.http.clone(),
            provider,
            Arc::clone(&self.config),
        ))
    }
}

/// Shared reqwest client builder
fn build_http(config: &TranslatorConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .pool_max_idle_per_host(10)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::display_outcome;
    use crate::core::providers::{RequestShape, ResponseField};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_provider() -> ProviderConfig {
        ProviderConfig {
            tag: "Test".to_string(),
            model_id: "test/model".to_string(),
            shape: RequestShape::TaggedParameters,
            response_field: ResponseField::TranslationText,
            pairs: Some(vec![("en".to_string(), "ary".to_string())]),
            code_map: vec![],
        }
    }

    fn test_config(base_url: &str) -> TranslatorConfig {
        TranslatorConfig {
            api_token: "hf_test".to_string(),
            inference_base_url: base_url.to_string(),
            catalog_base_url: base_url.to_string(),
            cache_dir: PathBuf::from(".dataset_cache"),
            max_attempts: 3,
            retry_delay_ms: 1,
            timeout_ms: 5000,
        }
    }

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn counting_route<F>(hits: Arc<AtomicUsize>, respond: F) -> Router
    where
        F: Fn() -> (StatusCode, Json<serde_json::Value>) + Clone + Send + Sync + 'static,
    {
        Router::new().route(
            "/models/test/model",
            post(move || {
                let respond = respond.clone();
                hits.fetch_add(1, Ordering::SeqCst);
                async move { respond() }
            }),
        )
    }

    #[tokio::test]
    async fn test_success_extracts_text_field() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = counting_route(Arc::clone(&hits), || {
            (
                StatusCode::OK,
                Json(serde_json::json!([{"translation_text": "Hello"}])),
            )
        });
        let base = spawn_server(app).await;

        let client = ProviderClient::new(test_provider(), test_config(&base)).unwrap();
        let request = TranslationRequest::new("salam", "en", "ary");
        let translation = client.translate(&request).await.unwrap();

        assert_eq!(translation.text, "Hello");
        assert_eq!(translation.provider, "Test");
        // No attempts after the first success
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_retries_then_reports() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = counting_route(Arc::clone(&hits), || {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "upstream down"})),
            )
        });
        let base = spawn_server(app).await;

        let client = ProviderClient::new(test_provider(), test_config(&base)).unwrap();
        let request = TranslationRequest::new("salam", "en", "ary");
        let result = client.translate(&request).await;

        // Exactly max_attempts attempts before the terminal error
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::RetriesExhausted { attempts: 3, .. }
        ));

        let display = display_outcome("Test", &Err(err));
        assert!(display.starts_with("[Test] API request failed after 3 attempts:"));
    }

    #[tokio::test]
    async fn test_malformed_response_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = counting_route(Arc::clone(&hits), || {
            (StatusCode::OK, Json(serde_json::json!({"unexpected": true})))
        });
        let base = spawn_server(app).await;

        let client = ProviderClient::new(test_provider(), test_config(&base)).unwrap();
        let request = TranslationRequest::new("salam", "en", "ary");
        let err = client.translate(&request).await.unwrap_err();

        assert!(matches!(err, TranslationError::InvalidResponseError { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_pair_rejected_locally() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = counting_route(Arc::clone(&hits), || {
            (
                StatusCode::OK,
                Json(serde_json::json!([{"translation_text": "x"}])),
            )
        });
        let base = spawn_server(app).await;

        let client = ProviderClient::new(test_provider(), test_config(&base)).unwrap();
        let request = TranslationRequest::new("salam", "ary", "en");
        let err = client.translate(&request).await.unwrap_err();

        assert!(matches!(err, TranslationError::UnsupportedPair { .. }));
        // Rejected before any network call
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let registry = ProviderRegistry::new(test_config("http://127.0.0.1:1")).unwrap();

        assert!(registry.client("nllb").is_ok());
        assert!(registry.client("Terjman").is_ok());

        let err = registry.client("nonexistent").unwrap_err();
        assert!(matches!(err, TranslationError::UnknownProvider { .. }));
    }

    #[tokio::test]
    async fn test_registry_rejects_missing_credential() {
        let config = TranslatorConfig {
            api_token: String::new(),
            ..test_config("http://127.0.0.1:1")
        };

        assert!(matches!(
            ProviderRegistry::new(config).unwrap_err(),
            TranslationError::MissingCredential { .. }
        ));
    }
}
