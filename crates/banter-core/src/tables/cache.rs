//! In-process cache of loaded tables.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::source::TableSource;
use super::{Table, TableKey, TableSpec};

/// Lazy cache keyed by `(workbook, table)`.
///
/// A table is fetched on first access and the snapshot served until a
/// caller passes `force`. Entries never expire on their own. An empty
/// load result (missing table, fetch failure, or a table with no data
/// rows) is served for the current call but treated as absent, so the
/// next access retries the fetch instead of pinning the failure.
#[derive(Debug)]
pub struct TableCache<S> {
    source: S,
    entries: HashMap<(String, String), Table>,
}

impl<S: TableSource> TableCache<S> {
    /// Create a cache over the given source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    /// Get a table, loading it if absent or if `force` is set.
    pub fn get(&mut self, workbook: &str, spec: &TableSpec, force: bool) -> &Table {
        let key = (workbook.to_string(), spec.name.to_string());
        let fresh = !force && self.entries.get(&key).map_or(false, |t| !t.is_empty());
        if !fresh {
            let table = self.load(workbook, spec);
            debug!(
                workbook,
                table = spec.name,
                rows = table.len(),
                force,
                "loaded table"
            );
            self.entries.insert(key.clone(), table);
        }
        &self.entries[&key]
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Fetch and shape one table. Failures come back as an empty table.
    fn load(&self, workbook: &str, spec: &TableSpec) -> Table {
        let rows = match self.source.fetch(workbook, spec.name) {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                warn!(workbook, table = spec.name, "table not found in source");
                return Table::default();
            }
            Err(err) => {
                warn!(workbook, table = spec.name, error = %err, "table fetch failed");
                return Table::default();
            }
        };

        let mut table = Table::default();
        // Row 0 is the header.
        for row in rows.into_iter().skip(1) {
            if row.len() < spec.key_columns {
                continue;
            }

            let mut cells = row.into_iter().map(|c| c.trim().to_string());
            let mut keys: Vec<String> = cells.by_ref().take(spec.key_columns).collect();
            let mut values: Vec<String> = cells.filter(|c| !c.is_empty()).collect();
            if let Some(cap) = spec.value_columns {
                values.truncate(cap);
            }

            let key = if spec.key_columns == 1 {
                TableKey::One(keys.remove(0))
            } else {
                TableKey::Many(keys)
            };

            // Repeated keys accumulate, regardless of key arity.
            table.entry(key).or_default().extend(values);
        }
        table
    }
}
