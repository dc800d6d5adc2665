//! Lazy table cache over an opaque row source.
//!
//! Tables live in a named workbook; each table is a grid of string
//! cells whose leading columns form a key and whose remaining columns
//! form a value list. The cache loads a table once and serves the
//! snapshot until it is explicitly force-reloaded.

mod cache;
mod source;

pub use cache::TableCache;
pub use source::{RawRows, TableSource};

use indexmap::IndexMap;

/// Key of one table row: a single column or a tuple of several.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    One(String),
    Many(Vec<String>),
}

impl TableKey {
    /// The key's single column, if it has exactly one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            TableKey::One(key) => Some(key),
            TableKey::Many(_) => None,
        }
    }

    /// All key columns in order.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            TableKey::One(key) => vec![key.as_str()],
            TableKey::Many(parts) => parts.iter().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKey::One(key) => f.write_str(key),
            TableKey::Many(parts) => f.write_str(&parts.join(" | ")),
        }
    }
}

/// A loaded table: insertion-ordered mapping from key to value list.
pub type Table = IndexMap<TableKey, Vec<String>>;

/// Shape of a known table: how many leading columns form the key and an
/// optional cap on value columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name within the workbook.
    pub name: &'static str,
    /// Leading columns forming the row key.
    pub key_columns: usize,
    /// Cap on the number of value cells kept per row, if any.
    pub value_columns: Option<usize>,
}

impl TableSpec {
    /// Spec with uncapped value columns.
    pub const fn new(name: &'static str, key_columns: usize) -> Self {
        Self {
            name,
            key_columns,
            value_columns: None,
        }
    }

    /// Spec keeping at most `value_columns` value cells per row.
    pub const fn capped(name: &'static str, key_columns: usize, value_columns: usize) -> Self {
        Self {
            name,
            key_columns,
            value_columns: Some(value_columns),
        }
    }
}
