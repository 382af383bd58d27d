//! Provider endpoint configuration
//!
//! One [`ProviderConfig`] per remote model: endpoint, request-body shape,
//! response field, and supported language pairs. The generic client in
//! `core::client` is polymorphic over these instead of hard-coding one
//! implementation per provider.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationRequest;

/// JSON body shape expected by the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    /// `{"inputs": text, "parameters": {"src_lang": .., "tgt_lang": ..}}`
    TaggedParameters,
    /// `{"inputs": text}` - the model is fixed to one language pair
    PlainInputs,
    /// `{"inputs": "<instruction>\n\n<text>"}` - pair embedded in the prompt
    InstructionPrompt,
}

/// Field carrying the translated text in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseField {
    TranslationText,
    GeneratedText,
}

impl ResponseField {
    /// JSON key for this field
    pub fn key(&self) -> &'static str {
        match self {
            ResponseField::TranslationText => "translation_text",
            ResponseField::GeneratedText => "generated_text",
        }
    }
}

/// Configuration for one remote translation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Short tag used in logs and error markers
    pub tag: String,
    /// Remote model identifier
    pub model_id: String,
    pub shape: RequestShape,
    pub response_field: ResponseField,
    /// Supported (source, target) pairs; `None` accepts any pair
    pub pairs: Option<Vec<(String, String)>>,
    /// Canonical language tag -> provider-specific code
    pub code_map: Vec<(String, String)>,
}

impl ProviderConfig {
    /// Check a language pair against this provider's pair table
    pub fn supports(&self, source: &str, target: &str) -> bool {
        match &self.pairs {
            None => true,
            Some(pairs) => pairs.iter().any(|(s, t)| s == source && t == target),
        }
    }

    /// Map a canonical language tag to this provider's code
    pub fn lang_code(&self, tag: &str) -> String {
        self.code_map
            .iter()
            .find(|(canonical, _)| canonical == tag)
            .map(|(_, code)| code.clone())
            .unwrap_or_else(|| tag.to_string())
    }

    /// Inference URL for this provider
    pub fn endpoint(&self, base_url: &str) -> String {
        format!("{}/models/{}", base_url.trim_end_matches('/'), self.model_id)
    }

    /// Build the request body for this provider's shape
    pub fn build_body(&self, request: &TranslationRequest) -> Value {
        match self.shape {
            RequestShape::TaggedParameters => json!({
                "inputs": request.text,
                "parameters": {
                    "src_lang": self.lang_code(&request.source_lang),
                    "tgt_lang": self.lang_code(&request.target_lang),
                }
            }),
            RequestShape::PlainInputs => json!({
                "inputs": request.text,
            }),
            RequestShape::InstructionPrompt => json!({
                "inputs": format!(
                    "Translate the following text from {} to {}. Reply with the translation only.\n\n{}",
                    lang_name(&request.source_lang),
                    lang_name(&request.target_lang),
                    request.text
                ),
            }),
        }
    }

    /// Extract the translated text from the response envelope.
    ///
    /// The endpoint replies with a one-element array whose object carries
    /// the configured response field; anything else is a malformed response.
    pub fn extract_text(&self, value: &Value) -> Result<String> {
        value
            .as_array()
            .and_then(|items| items.first())
            .and_then(|item| item.get(self.response_field.key()))
            .and_then(|text| text.as_str())
            .map(|text| text.to_string())
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: format!("no `{}` in response", self.response_field.key()),
            })
    }
}

/// Human-readable language name for prompt-shaped providers
fn lang_name(tag: &str) -> &str {
    match tag {
        "en" => "English",
        "ary" => "Moroccan Darija",
        "ar" => "Arabic",
        "fr" => "French",
        other => other,
    }
}

/// Built-in provider table
pub fn builtin_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            tag: "NLLB".to_string(),
            model_id: "facebook/nllb-200-distilled-600M".to_string(),
            shape: RequestShape::TaggedParameters,
            response_field: ResponseField::TranslationText,
            pairs: None,
            code_map: vec![
                ("en".to_string(), "eng_Latn".to_string()),
                ("ary".to_string(), "ary_Arab".to_string()),
                ("ar".to_string(), "arb_Arab".to_string()),
                ("fr".to_string(), "fra_Latn".to_string()),
            ],
        },
        ProviderConfig {
            tag: "Seamless".to_string(),
            model_id: "facebook/seamless-m4t-v2-large".to_string(),
            shape: RequestShape::TaggedParameters,
            response_field: ResponseField::TranslationText,
            pairs: None,
            code_map: vec![
                ("en".to_string(), "eng".to_string()),
                ("ary".to_string(), "ary".to_string()),
                ("ar".to_string(), "arb".to_string()),
                ("fr".to_string(), "fra".to_string()),
            ],
        },
        ProviderConfig {
            tag: "Helsinki".to_string(),
            model_id: "Helsinki-NLP/opus-mt-ar-en".to_string(),
            shape: RequestShape::PlainInputs,
            response_field: ResponseField::TranslationText,
            pairs: Some(vec![
                ("ar".to_string(), "en".to_string()),
                ("ary".to_string(), "en".to_string()),
            ]),
            code_map: vec![],
        },
        ProviderConfig {
            tag: "Terjman".to_string(),
            model_id: "atlasia/Terjman-Large-v2".to_string(),
            shape: RequestShape::PlainInputs,
            response_field: ResponseField::GeneratedText,
            pairs: Some(vec![("en".to_string(), "ary".to_string())]),
            code_map: vec![],
        },
        ProviderConfig {
            tag: "Gemma".to_string(),
            model_id: "google/gemma-2-9b-it".to_string(),
            shape: RequestShape::InstructionPrompt,
            response_field: ResponseField::GeneratedText,
            pairs: None,
            code_map: vec![],
        },
    ]
}

/// Find a provider by tag, case-insensitive
pub fn find_provider<'a>(providers: &'a [ProviderConfig], name: &str) -> Option<&'a ProviderConfig> {
    providers.iter().find(|p| p.tag.eq_ignore_ascii_case(name))
}
