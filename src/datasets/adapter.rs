//! Dataset loading adapter
//!
//! Thin layer over the catalog: loads a named dataset into the configured
//! cache directory, logs its shape, and degrades every failure to `None`.
//! Callers that need the error itself use [`HubCatalog`] directly.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::Result;
use crate::datasets::catalog::HubCatalog;
use crate::datasets::model::Dataset;

/// Load-or-nothing dataset access
#[derive(Debug, Clone)]
pub struct DatasetAdapter {
    catalog: HubCatalog,
    cache_dir: PathBuf,
}

impl DatasetAdapter {
    pub fn new(catalog: HubCatalog, cache_dir: PathBuf) -> Self {
        Self { catalog, cache_dir }
    }

    /// Build catalog and adapter from one configuration
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let catalog = HubCatalog::new(config)?;
        Ok(Self::new(catalog, config.cache_dir.clone()))
    }

    /// Cache directory this adapter populates
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Load a named dataset. Failures are logged and reported as `None`,
    /// never propagated.
    pub async fn load(&self, name: &str) -> Option<Dataset> {
        match self.catalog.load(name, &self.cache_dir).await {
            Ok(dataset) => {
                log_shape(name, &dataset);
                Some(dataset)
            }
            Err(e) => {
                warn!("Failed to load dataset {}: {}", name, e);
                None
            }
        }
    }
}

/// Log row/column counts per split
fn log_shape(name: &str, dataset: &Dataset) {
    match dataset {
        Dataset::Table(table) => {
            info!(
                "Dataset {}: {} rows x {} columns",
                name,
                table.len(),
                table.columns.len()
            );
        }
        Dataset::Splits(splits) => {
            for (label, inner) in splits {
                log_split_shape(name, label, inner);
            }
        }
        Dataset::Lazy(_) => {
            info!("Dataset {}: streaming rows", name);
        }
    }
}

fn log_split_shape(name: &str, label: &str, dataset: &Dataset) {
    match dataset {
        Dataset::Table(table) => {
            info!(
                "Dataset {} split {}: {} rows x {} columns",
                name,
                label,
                table.len(),
                table.columns.len()
            );
        }
        Dataset::Splits(splits) => {
            for (inner_label, inner) in splits {
                log_split_shape(name, &format!("{}/{}", label, inner_label), inner);
            }
        }
        Dataset::Lazy(_) => {
            info!("Dataset {} split {}: streaming rows", name, label);
        }
    }
}
