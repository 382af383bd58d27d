//! Dataset cleaning
//!
//! Removes columns with empty names and rows where every value is empty.
//! Split mappings are cleaned recursively. Lazy datasets only support row
//! removal (their schema is not known up front), applied lazily as the
//! iterator is driven.

use serde_json::Value;

use crate::datasets::model::{Dataset, LazyRows, Record, Table};

/// Python-style emptiness: null, false, zero, empty string/array/object
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn row_is_empty(record: &Record) -> bool {
    record.values().all(is_falsy)
}

/// Drop columns whose trimmed name is empty. Lazy datasets pass through
/// unchanged.
pub fn remove_empty_columns(dataset: Dataset) -> Dataset {
    match dataset {
        Dataset::Table(table) => Dataset::Table(strip_empty_columns(table)),
        Dataset::Splits(splits) => Dataset::Splits(
            splits
                .into_iter()
                .map(|(name, inner)| (name, remove_empty_columns(inner)))
                .collect(),
        ),
        Dataset::Lazy(rows) => Dataset::Lazy(rows),
    }
}

/// Drop rows where every value is empty. Lazy datasets are wrapped with a
/// lazy filter; no row is inspected until the iterator is driven.
pub fn remove_empty_rows(dataset: Dataset) -> Dataset {
    match dataset {
        Dataset::Table(mut table) => {
            table.rows.retain(|row| !row_is_empty(row));
            Dataset::Table(table)
        }
        Dataset::Splits(splits) => Dataset::Splits(
            splits
                .into_iter()
                .map(|(name, inner)| (name, remove_empty_rows(inner)))
                .collect(),
        ),
        Dataset::Lazy(rows) => Dataset::Lazy(LazyRows::new(rows.filter(|row| !row_is_empty(row)))),
    }
}

/// Both cleaning passes, columns first
pub fn clean(dataset: Dataset) -> Dataset {
    remove_empty_rows(remove_empty_columns(dataset))
}

fn strip_empty_columns(table: Table) -> Table {
    let Table { columns, mut rows } = table;

    let dropped: Vec<String> = columns
        .iter()
        .filter(|name| name.trim().is_empty())
        .cloned()
        .collect();

    if dropped.is_empty() {
        return Table { columns, rows };
    }

    for row in &mut rows {
        row.retain(|key, _| !key.trim().is_empty());
    }

    Table {
        columns: columns
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .collect(),
        rows,
    }
}
