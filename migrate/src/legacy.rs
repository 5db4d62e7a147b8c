//! Reading the legacy flat symbols table.

use std::collections::BTreeMap;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::{MigrateError, Result};

/// Name of the legacy flat table.
pub const LEGACY_TABLE: &str = "symbols";

/// One legacy row, keyed by the legacy column names (TitleCase with
/// underscores, e.g. `Symbol_Name`, `MPN`).
///
/// Every value is carried as text; the legacy schema declared everything
/// TEXT and downstream mapping re-types the handful of numeric fields.
/// NULL stays `None`, the empty string stays `Some("")`.
#[derive(Debug, Clone, Default)]
pub struct LegacyRow {
    fields: BTreeMap<String, Option<String>>,
}

impl LegacyRow {
    /// The value of a column, if present and non-NULL.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    /// Like [`get`](Self::get), but treats the empty string as absent.
    /// Used for fields with substitute defaults, matching how the legacy
    /// data mixed the two to mean "unknown".
    pub fn get_nonempty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Sets a field. Test and synthetic-row constructor.
    pub fn set(&mut self, column: &str, value: Option<&str>) {
        self.fields
            .insert(column.to_string(), value.map(str::to_string));
    }
}

/// Reads all legacy symbols, ordered by `Symbol_Name` so migration output
/// is stable across runs.
pub fn read_symbols(conn: &Connection) -> Result<Vec<LegacyRow>> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [LEGACY_TABLE],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(MigrateError::MissingLegacyTable(LEGACY_TABLE.to_string()));
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT * FROM {LEGACY_TABLE} ORDER BY Symbol_Name"
    ))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut raw = stmt.query([])?;
    while let Some(row) = raw.next()? {
        let mut legacy = LegacyRow::default();
        for (i, name) in columns.iter().enumerate() {
            let value = match row.get_ref(i)? {
                ValueRef::Null => None,
                ValueRef::Integer(n) => Some(n.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                ValueRef::Blob(_) => None,
            };
            legacy.set(name, value.as_deref());
        }
        rows.push(legacy);
    }
    Ok(rows)
}
