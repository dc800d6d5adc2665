//! File-backed table source.
//!
//! Tables live under `<root>/<workbook>/<table>.json`, each file a JSON
//! array of rows (arrays of string cells) with the header row included,
//! mirroring the layout of the remote spreadsheet it stands in for.

use std::fs::File;
use std::path::PathBuf;

use banter_core::{BanterResult, RawRows, TableSource};

/// Table source reading workbook directories from disk.
#[derive(Debug, Clone)]
pub struct FileWorkbook {
    root: PathBuf,
}

impl FileWorkbook {
    /// Create a source rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TableSource for FileWorkbook {
    fn fetch(&self, workbook: &str, table: &str) -> BanterResult<Option<RawRows>> {
        let path = self.root.join(workbook).join(format!("{table}.json"));
        if !path.exists() {
            return Ok(None);
        }
        let rows: RawRows = serde_json::from_reader(File::open(path)?)?;
        Ok(Some(rows))
    }
}
