//! Table source trait - the remote-fetch collaborator.

use crate::error::BanterResult;

/// Raw rows of a fetched table, header row included.
pub type RawRows = Vec<Vec<String>>;

/// A provider of raw table rows, such as a spreadsheet backend or a
/// directory of files.
///
/// The first row of a fetched table is a header and is skipped by the
/// cache loader. A missing workbook or table is `Ok(None)`, not an
/// error; errors are reserved for the source's own failures (IO,
/// malformed backing data).
pub trait TableSource {
    /// Fetch every row of `table` inside `workbook`.
    fn fetch(&self, workbook: &str, table: &str) -> BanterResult<Option<RawRows>>;
}
