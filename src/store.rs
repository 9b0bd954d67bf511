// src/store.rs
//
// In-memory table shape shared by every page, plus the small on-disk cache
// the GUI reloads at startup (`<store>/<page>.csv`).

use std::path::{Path, PathBuf};

use crate::{
    Error, Result,
    config::options::PageKind,
    csv::{read_csv, write_dataset},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers: Some(headers), rows }
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn header_count(&self) -> usize {
        self.headers.as_ref().map(|h| h.len()).unwrap_or(0)
    }

    /// Header index by exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == name)
    }

    /// Header index by name, or a MissingColumn error naming `source`.
    pub fn require(&self, name: &str, source: &Path) -> Result<usize> {
        self.column(name).ok_or_else(|| Error::missing_column(name, source))
    }
}

/// Cell accessor tolerant of short rows and absent optional columns.
#[inline]
pub fn field(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

fn cache_path(store_dir: &Path, kind: &PageKind) -> PathBuf {
    let name = match kind {
        PageKind::Authors => "authors.csv",
        PageKind::Works => "works.csv",
        PageKind::Articles => "articles.csv",
    };
    store_dir.join(name)
}

pub fn save_dataset(store_dir: &Path, kind: &PageKind, ds: &DataSet) -> Result<PathBuf> {
    let path = cache_path(store_dir, kind);
    write_dataset(&path, ds, b',')?;
    Ok(path)
}

pub fn load_dataset(store_dir: &Path, kind: &PageKind) -> Result<DataSet> {
    read_csv(&cache_path(store_dir, kind))
}
