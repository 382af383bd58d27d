//! Core data models for translation and unified dataset records

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Translation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub provider: String,
}

/// Render a translation outcome as one plain display string.
///
/// Success is the bare translated text; failure is decorated with the
/// provider tag so display layers can show it in the same field.
pub fn display_outcome(tag: &str, outcome: &Result<Translation>) -> String {
    match outcome {
        Ok(translation) => translation.text.clone(),
        Err(e) => format!("[{}] {}", tag, e),
    }
}

/// One normalized parallel sample. Treated as immutable after conversion:
/// constructed by the converters in `datasets::convert` and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedDataSample {
    pub english: String,
    pub darija: String,
    pub source: Option<String>,
    pub id: Option<String>,
    pub includes_arabizi: Option<bool>,
    /// Provider-specific extra fields, carried verbatim
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A named collection of unified samples. Owns its samples exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedDataset {
    pub samples: Vec<UnifiedDataSample>,
    pub name: String,
    pub subset: Option<String>,
}

impl UnifiedDataset {
    pub fn new(
        name: impl Into<String>,
        subset: Option<String>,
        samples: Vec<UnifiedDataSample>,
    ) -> Self {
        Self {
            samples,
            name: name.into(),
            subset,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnifiedDataSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TranslationError;

    #[test]
    fn test_display_outcome_success_is_bare_text() {
        let outcome = Ok(Translation {
            text: "Hello".to_string(),
            provider: "NLLB".to_string(),
        });
        assert_eq!(display_outcome("NLLB", &outcome), "Hello");
    }

    #[test]
    fn test_display_outcome_failure_is_tagged() {
        let outcome: Result<Translation> = Err(TranslationError::RetriesExhausted {
            attempts: 3,
            message: "API error: 500 - boom".to_string(),
        });
        assert_eq!(
            display_outcome("Seamless", &outcome),
            "[Seamless] API request failed after 3 attempts: API error: 500 - boom"
        );
    }
}
