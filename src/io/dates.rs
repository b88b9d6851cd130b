use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Issue-id to publication-date lookup, loaded from the archive's
/// date spreadsheet. Used when an issue's own date banner could not
/// be recovered.
#[derive(Debug, Clone, Default)]
pub struct DateIndex {
    dates: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct DateRow {
    #[serde(rename = "Identifier")]
    identifier: String,
    pub_date: String,
}

impl DateIndex {
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open date index: {:?}", path))?;
        let mut dates = HashMap::new();
        for row in reader.deserialize() {
            let row: DateRow = row.context("Malformed date index row")?;
            dates.insert(row.identifier, row.pub_date);
        }
        Ok(Self { dates })
    }

    /// Publication date for an eight-digit issue id, if indexed.
    pub fn lookup(&self, issue_id: &str) -> Option<String> {
        self.dates.get(issue_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.csv");
        std::fs::write(
            &path,
            "Identifier,pub_date\n19910514,1991-05-14\n19910515,1991-05-15\n",
        )
        .unwrap();
        let index = DateIndex::load(&path).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("19910514").as_deref(), Some("1991-05-14"));
        assert_eq!(index.lookup("19990101"), None);
    }
}
