//! HTTP API server implementation
//!
//! Display layers consume this surface and receive plain strings: a failed
//! translation comes back as the tagged marker in the same field as real
//! output.

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::client::ProviderRegistry;
use crate::core::models::{display_outcome, TranslationRequest};

/// Application state
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ProviderRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Providers list response
#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

#[derive(Serialize)]
pub struct ProviderInfo {
    pub tag: String,
    pub model: String,
    /// Supported pairs as `src->tgt`; empty means any pair
    pub pairs: Vec<String>,
}

/// Translation request
#[derive(Deserialize)]
pub struct TranslateRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub text_list: Vec<String>,
    pub provider: Option<String>,
}

/// Translation response
#[derive(Serialize)]
pub struct TranslateResponse {
    pub translations: Vec<TranslationItem>,
}

#[derive(Serialize)]
pub struct TranslationItem {
    pub provider: String,
    pub text: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check handler
async fn health_check() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok".to_string(),
        service: "darija-translator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Providers list handler
async fn get_providers(State(state): State<Arc<AppState>>) -> axum::Json<ProvidersResponse> {
    let providers = state
        .registry
        .providers()
        .iter()
        .map(|p| ProviderInfo {
            tag: p.tag.clone(),
            model: p.model_id.clone(),
            pairs: p
                .pairs
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|(s, t)| format!("{}->{}", s, t))
                .collect(),
        })
        .collect();

    axum::Json(ProvidersResponse { providers })
}

/// Translation handler. Texts are translated serially; per-text failures
/// surface as the tagged display string.
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<axum::Json<TranslateResponse>, axum::Json<ErrorResponse>> {
    if payload.text_list.is_empty() {
        return Err(axum::Json(ErrorResponse {
            error: ErrorDetail {
                message: "text_list cannot be empty".to_string(),
                code: Some("invalid_request".to_string()),
            },
        }));
    }

    let tag = payload
        .provider
        .clone()
        .or_else(|| state.registry.default_tag().map(|t| t.to_string()))
        .unwrap_or_default();

    let client = match state.registry.client(&tag) {
        Ok(client) => client,
        Err(e) => {
            return Err(axum::Json(ErrorResponse {
                error: ErrorDetail {
                    message: e.to_string(),
                    code: Some("unknown_provider".to_string()),
                },
            }));
        }
    };

    let mut translations = Vec::new();
    for text in payload.text_list {
        let request =
            TranslationRequest::new(text.clone(), &payload.source_lang, &payload.target_lang);

        let outcome = client.translate(&request).await;
        if let Err(ref e) = outcome {
            warn!("Translation failed for '{}': {}", text, e);
        }

        translations.push(TranslationItem {
            provider: tag.clone(),
            text: display_outcome(&tag, &outcome),
        });
    }

    Ok(axum::Json(TranslateResponse { translations }))
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/providers", get(get_providers))
        .route("/translate", post(translate))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16) -> anyhow::Result<()> {
    let registry = Arc::new(ProviderRegistry::from_env()?);
    let state = Arc::new(AppState::new(registry));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
