//! Darija Translator - English ↔ Moroccan Darija translation toolkit
//!
//! This library provides retrying clients for remote translation providers,
//! dataset loading and cleaning over a remote catalog, and conversion of
//! provider records into one unified parallel-text schema.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod datasets;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{ProviderClient, ProviderRegistry},
    config::TranslatorConfig,
    errors::TranslationError,
    models::{display_outcome, Translation, TranslationRequest, UnifiedDataSample, UnifiedDataset},
    providers::{builtin_providers, ProviderConfig, RequestShape, ResponseField},
    session::{Device, HistoryEntry, SessionContext},
};

pub use crate::datasets::{
    adapter::DatasetAdapter,
    catalog::HubCatalog,
    cleaner::{clean, remove_empty_columns, remove_empty_rows},
    convert::{convert_lenient, convert_strict, detect_arabizi, table_to_unified},
    model::{Dataset, LazyRows, Record, Table},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
