//! Dataset container types

use std::collections::BTreeMap;
use std::fmt;

/// One raw provider record: column name -> JSON value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Fully materialized split
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows produced on demand. The schema is not known up front, so
/// column-level operations do not apply to lazy data.
pub struct LazyRows {
    inner: Box<dyn Iterator<Item = Record> + Send>,
}

impl LazyRows {
    pub fn new(iter: impl Iterator<Item = Record> + Send + 'static) -> Self {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl Iterator for LazyRows {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.inner.next()
    }
}

impl fmt::Debug for LazyRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyRows(..)")
    }
}

/// A loaded dataset: one table, a mapping of named splits, or a lazy
/// row stream
#[derive(Debug)]
pub enum Dataset {
    Table(Table),
    Splits(BTreeMap<String, Dataset>),
    Lazy(LazyRows),
}

impl Dataset {
    /// Collect every materialized table with its split path. Lazy splits
    /// are skipped; the empty label denotes a root-level table.
    pub fn tables(&self) -> Vec<(String, &Table)> {
        let mut out = Vec::new();
        collect_tables(self, "", &mut out);
        out
    }
}

fn collect_tables<'a>(dataset: &'a Dataset, prefix: &str, out: &mut Vec<(String, &'a Table)>) {
    match dataset {
        Dataset::Table(table) => out.push((prefix.to_string(), table)),
        Dataset::Splits(splits) => {
            for (name, inner) in splits {
                let label = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", prefix, name)
                };
                collect_tables(inner, &label, out);
            }
        }
        Dataset::Lazy(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_tables_flattens_nested_splits() {
        let mut inner = BTreeMap::new();
        inner.insert(
            "train".to_string(),
            Dataset::Table(Table::new(
                vec!["english".to_string()],
                vec![record(&[("english", json!("hi"))])],
            )),
        );
        inner.insert("stream".to_string(), Dataset::Lazy(LazyRows::new(std::iter::empty())));

        let mut splits = BTreeMap::new();
        splits.insert("default".to_string(), Dataset::Splits(inner));

        let dataset = Dataset::Splits(splits);
        let tables = dataset.tables();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "default/train");
        assert_eq!(tables[0].1.len(), 1);
    }
}
