//! Provider record -> unified sample conversion
//!
//! Two policies exist and neither is authoritative: `convert_lenient` never
//! fails and shunts unknown keys into metadata; `convert_strict` requires
//! the full key set and propagates the first missing one.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{UnifiedDataSample, UnifiedDataset};
use crate::datasets::model::{Record, Table};

const KEY_ENGLISH: &str = "english";
const KEY_DARIJA: &str = "darija";
const KEY_SOURCE: &str = "source";
const KEY_ID: &str = "id";
const KEY_ARABIZI: &str = "includes_arabizi";

const RECOGNIZED_KEYS: [&str; 5] = [KEY_ENGLISH, KEY_DARIJA, KEY_SOURCE, KEY_ID, KEY_ARABIZI];

fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn optional_string(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(|v| match v {
        Value::Null => None,
        other => Some(value_as_string(other)),
    })
}

/// Convert a provider record, tolerating missing required fields.
///
/// Missing `english`/`darija` become empty strings; every key outside the
/// unified schema is carried verbatim in `metadata`.
pub fn convert_lenient(record: &Record) -> UnifiedDataSample {
    let metadata = record
        .iter()
        .filter(|(key, _)| !RECOGNIZED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    UnifiedDataSample {
        english: record.get(KEY_ENGLISH).map(value_as_string).unwrap_or_default(),
        darija: record.get(KEY_DARIJA).map(value_as_string).unwrap_or_default(),
        source: optional_string(record, KEY_SOURCE),
        id: optional_string(record, KEY_ID),
        includes_arabizi: record.get(KEY_ARABIZI).and_then(Value::as_bool),
        metadata,
    }
}

/// Convert a provider record, requiring `english`, `darija` and
/// `includes_arabizi`. The text fields must be non-empty.
pub fn convert_strict(record: &Record) -> Result<UnifiedDataSample> {
    let english = record
        .get(KEY_ENGLISH)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TranslationError::MissingField {
            field: KEY_ENGLISH.to_string(),
        })?
        .to_string();

    let darija = record
        .get(KEY_DARIJA)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TranslationError::MissingField {
            field: KEY_DARIJA.to_string(),
        })?
        .to_string();

    let includes_arabizi = record
        .get(KEY_ARABIZI)
        .and_then(Value::as_bool)
        .ok_or_else(|| TranslationError::MissingField {
            field: KEY_ARABIZI.to_string(),
        })?;

    let metadata = record
        .iter()
        .filter(|(key, _)| !RECOGNIZED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(UnifiedDataSample {
        english,
        darija,
        source: optional_string(record, KEY_SOURCE),
        id: optional_string(record, KEY_ID),
        includes_arabizi: Some(includes_arabizi),
        metadata,
    })
}

/// Convert a whole table leniently into a unified dataset
pub fn table_to_unified(name: &str, subset: Option<String>, table: &Table) -> UnifiedDataset {
    let samples = table.rows.iter().map(convert_lenient).collect();
    UnifiedDataset::new(name, subset, samples)
}

/// Heuristic for arabizi: Latin-script Darija where digits stand in for
/// Arabic letters (2, 3, 5, 7, 9) adjacent to letters inside a word.
pub fn detect_arabizi(text: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN
        .get_or_init(|| Regex::new(r"(?i)[a-z][23579]|[23579][a-z]").expect("arabizi pattern"));
    re.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_lenient_routes_unknown_keys_to_metadata() {
        let sample = convert_lenient(&record(&[
            ("english", json!("hi")),
            ("darija", json!("salam")),
            ("extra", json!("x")),
        ]));

        assert_eq!(sample.english, "hi");
        assert_eq!(sample.darija, "salam");
        assert!(sample.source.is_none());
        assert!(sample.includes_arabizi.is_none());
        assert_json_eq!(json!(sample.metadata), json!({"extra": "x"}));
    }

    #[test]
    fn test_lenient_never_fails_on_missing_fields() {
        let sample = convert_lenient(&record(&[("darija", json!("wakha"))]));
        assert_eq!(sample.english, "");
        assert_eq!(sample.darija, "wakha");
        assert!(sample.metadata.is_empty());
    }

    #[test]
    fn test_lenient_reads_optional_fields() {
        let sample = convert_lenient(&record(&[
            ("english", json!("no")),
            ("darija", json!("lla")),
            ("source", json!("doda")),
            ("id", json!("s-41")),
            ("includes_arabizi", json!(false)),
        ]));

        assert_eq!(sample.source.as_deref(), Some("doda"));
        assert_eq!(sample.id.as_deref(), Some("s-41"));
        assert_eq!(sample.includes_arabizi, Some(false));
        assert!(sample.metadata.is_empty());
    }

    #[test]
    fn test_strict_requires_each_field() {
        let full = record(&[
            ("english", json!("hi")),
            ("darija", json!("salam")),
            ("includes_arabizi", json!(true)),
        ]);
        assert!(convert_strict(&full).is_ok());

        for missing in ["english", "darija", "includes_arabizi"] {
            let mut partial = full.clone();
            partial.remove(missing);
            let err = convert_strict(&partial).unwrap_err();
            assert!(
                matches!(err, TranslationError::MissingField { ref field } if field == missing),
                "expected MissingField for {}",
                missing
            );
        }
    }

    #[test]
    fn test_strict_rejects_empty_text() {
        let rec = record(&[
            ("english", json!("")),
            ("darija", json!("salam")),
            ("includes_arabizi", json!(false)),
        ]);
        assert!(matches!(
            convert_strict(&rec).unwrap_err(),
            TranslationError::MissingField { ref field } if field == "english"
        ));
    }

    #[test]
    fn test_table_conversion() {
        let table = Table::new(
            vec!["english".to_string(), "darija".to_string()],
            vec![
                record(&[("english", json!("hi")), ("darija", json!("salam"))]),
                record(&[("english", json!("bye")), ("darija", json!("bslama"))]),
            ],
        );

        let dataset = table_to_unified("doda", Some("train".to_string()), &table);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.name, "doda");
        assert_eq!(dataset.subset.as_deref(), Some("train"));
        assert_eq!(dataset.samples[1].darija, "bslama");
    }

    #[test]
    fn test_detect_arabizi() {
        assert!(detect_arabizi("labas 3lik?"));
        assert!(detect_arabizi("wash nta mzyan? 7amdullah"));
        assert!(detect_arabizi("kayn chi 9hwa?"));

        assert!(!detect_arabizi("hello world"));
        assert!(!detect_arabizi("salam, labas"));
        // Plain numbers are not arabizi
        assert!(!detect_arabizi("room 237"));
        assert!(!detect_arabizi("صباح الخير"));
    }
}
