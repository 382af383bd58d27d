//! Remote dataset catalog client
//!
//! Fetches named datasets from the datasets-server HTTP API (split
//! enumeration plus paged row fetches) and materializes each split into a
//! [`Table`]. Fetched splits are cached as JSON under the cache directory;
//! later loads read from disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::datasets::model::{Dataset, Record, Table};

const PAGE_SIZE: usize = 100;
const MAX_ROWS_PER_SPLIT: usize = 10_000;

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SplitInfo {
    config: String,
    split: String,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    features: Vec<Feature>,
    rows: Vec<RowItem>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RowItem {
    row: Record,
}

/// On-disk form of one fetched split
#[derive(Debug, Serialize, Deserialize)]
struct CachedSplit {
    columns: Vec<String>,
    rows: Vec<Record>,
}

/// HTTP client for the remote dataset catalog
#[derive(Debug, Clone)]
pub struct HubCatalog {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HubCatalog {
    /// Create a catalog client from configuration
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Load a named dataset, populating `cache_dir` as a side effect.
    ///
    /// A single-split dataset comes back as a bare table; anything else is
    /// a mapping of `config/split` labels to tables.
    pub async fn load(&self, name: &str, cache_dir: &Path) -> Result<Dataset> {
        let splits = self.list_splits(name, cache_dir).await?;

        if splits.is_empty() {
            return Err(TranslationError::DatasetError {
                name: name.to_string(),
                message: "catalog lists no splits".to_string(),
            });
        }

        let mut loaded: Vec<(String, Table)> = Vec::new();
        for info in &splits {
            let label = if info.config == "default" {
                info.split.clone()
            } else {
                format!("{}/{}", info.config, info.split)
            };
            let table = self.load_split(name, info, cache_dir).await?;
            loaded.push((label, table));
        }

        if loaded.len() == 1 {
            let (_, table) = loaded.swap_remove(0);
            return Ok(Dataset::Table(table));
        }

        let splits: BTreeMap<String, Dataset> = loaded
            .into_iter()
            .map(|(label, table)| (label, Dataset::Table(table)))
            .collect();

        Ok(Dataset::Splits(splits))
    }

    /// One split, from cache when present
    async fn load_split(&self, name: &str, info: &SplitInfo, cache_dir: &Path) -> Result<Table> {
        let path = cache_path(cache_dir, name, info);

        if path.exists() {
            match read_cached(&path).await {
                Ok(table) => {
                    debug!("Cache hit for {} {}/{}", name, info.config, info.split);
                    return Ok(table);
                }
                Err(e) => {
                    warn!("Discarding unreadable cache file {}: {}", path.display(), e);
                }
            }
        }

        let table = self.fetch_rows(name, info).await?;
        write_cached(&path, &table).await?;
        info!(
            "Fetched {} {}/{}: {} rows into cache",
            name,
            info.config,
            info.split,
            table.len()
        );

        Ok(table)
    }

    /// Split listing, from cache when present
    async fn list_splits(&self, name: &str, cache_dir: &Path) -> Result<Vec<SplitInfo>> {
        let path = splits_path(cache_dir, name);

        if path.exists() {
            match read_splits(&path).await {
                Ok(splits) => {
                    debug!("Cache hit for {} split listing", name);
                    return Ok(splits);
                }
                Err(e) => {
                    warn!("Discarding unreadable cache file {}: {}", path.display(), e);
                }
            }
        }

        let splits = self.fetch_splits(name).await?;
        write_splits(&path, &splits).await?;
        Ok(splits)
    }

    async fn fetch_splits(&self, name: &str) -> Result<Vec<SplitInfo>> {
        let url = format!("{}/splits", self.base_url);
        let response = self
            .request(&url)
            .query(&[("dataset", name)])
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::DatasetError {
                name: name.to_string(),
                message: format!("catalog returned {} for split listing", status.as_u16()),
            });
        }

        let body: SplitsResponse =
            response
                .json()
                .await
                .map_err(|e| TranslationError::DatasetError {
                    name: name.to_string(),
                    message: format!("malformed split listing: {}", e),
                })?;

        Ok(body.splits)
    }

    async fn fetch_rows(&self, name: &str, info: &SplitInfo) -> Result<Table> {
        let url = format!("{}/rows", self.base_url);
        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Record> = Vec::new();
        let mut offset = 0usize;

        loop {
            let response = self
                .request(&url)
                .query(&[
                    ("dataset", name),
                    ("config", info.config.as_str()),
                    ("split", info.split.as_str()),
                ])
                .query(&[("offset", offset), ("length", PAGE_SIZE)])
                .send()
                .await
                .map_err(|e| TranslationError::NetworkError {
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(TranslationError::DatasetError {
                    name: name.to_string(),
                    message: format!(
                        "catalog returned {} for rows of {}/{}",
                        status.as_u16(),
                        info.config,
                        info.split
                    ),
                });
            }

            let body: RowsResponse =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::DatasetError {
                        name: name.to_string(),
                        message: format!("malformed rows page: {}", e),
                    })?;

            if columns.is_empty() {
                columns = body.features.into_iter().map(|f| f.name).collect();
            }

            let page_len = body.rows.len();
            rows.extend(body.rows.into_iter().map(|item| item.row));

            if page_len < PAGE_SIZE || rows.len() >= MAX_ROWS_PER_SPLIT {
                if rows.len() >= MAX_ROWS_PER_SPLIT {
                    warn!(
                        "Truncating {} {}/{} at {} rows",
                        name, info.config, info.split, MAX_ROWS_PER_SPLIT
                    );
                    rows.truncate(MAX_ROWS_PER_SPLIT);
                }
                break;
            }
            offset += PAGE_SIZE;
        }

        Ok(Table::new(columns, rows))
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.get(url);
        if self.api_token.is_empty() {
            builder
        } else {
            builder.header("Authorization", format!("Bearer {}", self.api_token))
        }
    }
}

fn cache_path(cache_dir: &Path, name: &str, info: &SplitInfo) -> PathBuf {
    cache_dir
        .join(name.replace('/', "__"))
        .join(format!("{}__{}.json", info.config, info.split))
}

fn splits_path(cache_dir: &Path, name: &str) -> PathBuf {
    cache_dir.join(name.replace('/', "__")).join("_splits.json")
}

async fn read_splits(path: &Path) -> Result<Vec<SplitInfo>> {
    let content = tokio::fs::read_to_string(path).await?;
    let splits: Vec<SplitInfo> = serde_json::from_str(&content)?;
    Ok(splits)
}

async fn write_splits(path: &Path, splits: &[SplitInfo]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string(splits)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

async fn read_cached(path: &Path) -> Result<Table> {
    let content = tokio::fs::read_to_string(path).await?;
    let cached: CachedSplit = serde_json::from_str(&content)?;
    Ok(Table::new(cached.columns, cached.rows))
}

async fn write_cached(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let cached = CachedSplit {
        columns: table.columns.clone(),
        rows: table.rows.clone(),
    };
    let content = serde_json::to_string(&cached)?;
    tokio::fs::write(path, content).await?;

    Ok(())
}
