//! Session-scoped translation state
//!
//! The session owns what was previously ambient UI state: selected provider,
//! device, history. One [`SessionContext`] is created per session and dropped
//! when the session ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::core::client::ProviderRegistry;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{display_outcome, TranslationRequest};

/// Compute device recorded alongside session activity. Advisory only:
/// inference runs remotely, the device is surfaced back to display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda,
}

impl Default for Device {
    fn default() -> Self {
        Device::Cpu
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda => write!(f, "cuda"),
        }
    }
}

impl FromStr for Device {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda),
            other => Err(TranslationError::ConfigError {
                message: format!("unknown device: {}", other),
            }),
        }
    }
}

/// One completed translation interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub input: String,
    pub output: String,
    pub provider: String,
    pub source_lang: String,
    pub target_lang: String,
    pub succeeded: bool,
    pub at: DateTime<Utc>,
}

/// Mutable per-session state with an explicit lifecycle
#[derive(Debug, Clone)]
pub struct SessionContext {
    registry: ProviderRegistry,
    selected_provider: String,
    device: Device,
    history: Vec<HistoryEntry>,
    initialized: bool,
}

impl SessionContext {
    /// Start a session over a provider registry. The first registered
    /// provider is pre-selected.
    pub fn new(registry: ProviderRegistry) -> Self {
        let selected_provider = registry.default_tag().unwrap_or_default().to_string();
        info!("Session started with provider {}", selected_provider);

        Self {
            registry,
            selected_provider,
            device: Device::default(),
            history: Vec::new(),
            initialized: true,
        }
    }

    /// Switch the active provider
    pub fn select_provider(&mut self, name: &str) -> Result<()> {
        // Resolve through the registry so unknown names fail here, not
        // at translation time
        let client = self.registry.client(name)?;
        self.selected_provider = client.provider().tag.clone();
        info!("Session provider set to {}", self.selected_provider);
        Ok(())
    }

    /// Currently selected provider tag
    pub fn selected_provider(&self) -> &str {
        &self.selected_provider
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Translate through the selected provider and return the display string
    /// verbatim: the translated text, or the tagged error marker on failure.
    /// Every call is appended to the session history.
    pub async fn translate(&mut self, text: &str, source_lang: &str, target_lang: &str) -> String {
        let request = TranslationRequest::new(text, source_lang, target_lang);

        let outcome = match self.registry.client(&self.selected_provider) {
            Ok(client) => client.translate(&request).await,
            Err(e) => Err(e),
        };

        let output = display_outcome(&self.selected_provider, &outcome);

        self.history.push(HistoryEntry {
            input: text.to_string(),
            output: output.clone(),
            provider: self.selected_provider.clone(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            succeeded: outcome.is_ok(),
            at: Utc::now(),
        });

        output
    }

    /// Session history, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TranslatorConfig;
    use crate::core::providers::{ProviderConfig, RequestShape, ResponseField};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::path::PathBuf;

    fn test_providers() -> Vec<ProviderConfig> {
        vec![
            ProviderConfig {
                tag: "Alpha".to_string(),
                model_id: "test/alpha".to_string(),
                shape: RequestShape::PlainInputs,
                response_field: ResponseField::TranslationText,
                pairs: None,
                code_map: vec![],
            },
            ProviderConfig {
                tag: "Beta".to_string(),
                model_id: "test/beta".to_string(),
                shape: RequestShape::PlainInputs,
                response_field: ResponseField::GeneratedText,
                pairs: None,
                code_map: vec![],
            },
        ]
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

    #[tokio::test]
    async fn test_session_lifecycle_and_selection() {
        let registry =
            ProviderRegistry::with_providers(test_config("http://127.0.0.1:1"), test_providers())
                .unwrap();
        let mut session = SessionContext::new(registry);

        assert!(session.is_initialized());
        assert_eq!(session.selected_provider(), "Alpha");
        assert_eq!(session.device(), Device::Cpu);

        session.select_provider("beta").unwrap();
        assert_eq!(session.selected_provider(), "Beta");

        assert!(session.select_provider("gamma").is_err());
        // Failed selection leaves the previous provider active
        assert_eq!(session.selected_provider(), "Beta");
    }

    #[tokio::test]
    async fn test_translate_records_history_verbatim() {
        let app = Router::new().route(
            "/models/test/alpha",
            post(|| async { Json(serde_json::json!([{"translation_text": "Hello"}])) }),
        );
        let base = spawn_server(app).await;

        let registry =
            ProviderRegistry::with_providers(test_config(&base), test_providers()).unwrap();
        let mut session = SessionContext::new(registry);

        let shown = session.translate("salam", "ary", "en").await;
        assert_eq!(shown, "Hello");

        // Beta has no route on the mock server, so this surfaces as a marker
        session.select_provider("Beta").unwrap();
        let shown = session.translate("wakha", "ary", "en").await;
        assert!(shown.starts_with("[Beta] "));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert!(history[0].succeeded);
        assert_eq!(history[0].output, "Hello");
        assert!(!history[1].succeeded);
        assert_eq!(history[1].output, shown);

        session.clear_history();
        assert!(session.history().is_empty());
    }
}
