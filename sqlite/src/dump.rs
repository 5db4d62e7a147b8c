//! Deterministic dumping of live tables to canonical SQL text.
//!
//! The dumper is the only path from database back to text. Column order
//! comes from the registry, never from the live database, and rows are
//! sorted by primary key before rendering, so the output bytes depend only
//! on row content: insertion order, vacuum history, and rowid allocation
//! leave no trace.

use std::cmp::Ordering;

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use tracing::debug;

use partdb_core::{render_insert, render_literal, ColumnDef, SchemaRegistry, SqlValue};

use crate::error::{CatalogError, Result};

/// Dumps one category table to canonical SQL text.
///
/// The output contains, in order: a deterministic comment header with the
/// recomputed row count, `DROP TABLE IF EXISTS`, the registry's
/// `CREATE TABLE` verbatim, and the sorted INSERT statements wrapped in
/// `BEGIN TRANSACTION`/`COMMIT`. Every column is named explicitly in every
/// INSERT.
///
/// # Errors
///
/// - [`CatalogError::Registry`] if the category is not registered
/// - [`CatalogError::SchemaDrift`] if the live table's columns disagree
///   with the registry (fatal: the table needs a schema-evolution step)
/// - [`CatalogError::DuplicateKey`] if two rows share a primary key after
///   case normalization; the dump aborts rather than picking one
pub fn dump_category(conn: &Connection, registry: &SchemaRegistry, category: &str) -> Result<String> {
    let columns = registry.columns_for(category)?;
    let pk = registry.primary_key_for(category)?;
    check_schema_drift(conn, category, columns)?;

    let mut rows = read_table_rows(conn, category, columns)?;
    let pk_indices: Vec<usize> = pk
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|c| c.name == *name)
                .expect("primary key column is declared in the registry columns")
        })
        .collect();

    rows.sort_by(|a, b| compare_keys(a, b, &pk_indices));
    for pair in rows.windows(2) {
        if compare_keys(&pair[0], &pair[1], &pk_indices) == Ordering::Equal {
            let key = pk_indices
                .iter()
                .map(|&i| render_literal(&pair[0][i]))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CatalogError::DuplicateKey {
                category: category.to_string(),
                key,
            });
        }
    }

    debug!(category, rows = rows.len(), "rendering dump");

    let column_names: Vec<&str> = columns.iter().map(|c| c.name).collect();
    let mut out = String::new();
    out.push_str(&format!("-- {category} table\n"));
    out.push_str(&format!("-- Number of components: {}\n", rows.len()));
    out.push_str(&format!("-- Sorted by: {}\n", pk.join(", ")));
    out.push_str("--\n");
    out.push_str("-- This file is auto-generated and suitable for git tracking.\n");
    out.push_str("-- Rows are sorted deterministically to ensure consistent diffs.\n");
    out.push_str("--\n\n");
    out.push_str(&registry.drop_table_sql(category)?);
    out.push_str("\n\n");
    out.push_str(&registry.create_table_sql(category)?);
    out.push_str("\n\n");
    out.push_str("BEGIN TRANSACTION;\n\n");
    for row in &rows {
        out.push_str(&render_insert(category, &column_names, row));
        out.push('\n');
    }
    out.push_str("\nCOMMIT;\n");
    Ok(out)
}

/// Dumps every registered category, returning per-category results.
///
/// A [`CatalogError::DuplicateKey`] aborts only its own table; callers
/// should treat [`CatalogError::SchemaDrift`] and registry misses as fatal
/// to the whole run.
pub fn dump_all(conn: &Connection, registry: &SchemaRegistry) -> Vec<(String, Result<String>)> {
    registry
        .categories()
        .into_iter()
        .map(|category| {
            let result = dump_category(conn, registry, category);
            (category.to_string(), result)
        })
        .collect()
}

/// Verifies the live table's column names and order match the registry.
pub(crate) fn check_schema_drift(
    conn: &Connection,
    category: &str,
    columns: &[ColumnDef],
) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let live: Vec<String> = stmt
        .query_map([category], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let expected: Vec<&str> = columns.iter().map(|c| c.name).collect();
    if live.len() != expected.len() || live.iter().zip(&expected).any(|(l, e)| l != e) {
        return Err(CatalogError::SchemaDrift {
            category: category.to_string(),
            expected: expected.join(", "),
            actual: live.join(", "),
        });
    }
    Ok(())
}

/// Reads all rows of a table in registry column order.
pub(crate) fn read_table_rows(
    conn: &Connection,
    category: &str,
    columns: &[ColumnDef],
) -> Result<Vec<Vec<SqlValue>>> {
    let column_list = columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!("SELECT {column_list} FROM {category}"))?;

    let mut rows = Vec::new();
    let mut raw = stmt.query([])?;
    while let Some(row) = raw.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = match row.get_ref(i)? {
                ValueRef::Null => SqlValue::Null,
                ValueRef::Integer(n) => SqlValue::Integer(n),
                ValueRef::Real(f) => SqlValue::Real(f),
                ValueRef::Text(bytes) => {
                    SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
                }
                ValueRef::Blob(_) => {
                    return Err(CatalogError::UnsupportedBlob {
                        category: category.to_string(),
                        column: column.name.to_string(),
                    });
                }
            };
            values.push(value);
        }
        rows.push(values);
    }
    Ok(rows)
}

/// Compares two rows by their primary-key columns, in declared key order.
///
/// Text components compare by [`SqlValue::normalized_key`], matching the
/// NOCASE collation on part IDs; `Equal` across all key columns means a
/// duplicate key.
fn compare_keys(a: &[SqlValue], b: &[SqlValue], pk_indices: &[usize]) -> Ordering {
    for &i in pk_indices {
        let ord = compare_key_value(&a[i], &b[i]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_key_value(a: &SqlValue, b: &SqlValue) -> Ordering {
    use SqlValue::{Integer, Null, Real, Text};

    fn rank(v: &SqlValue) -> u8 {
        match v {
            Null => 0,
            Integer(_) | Real(_) => 1,
            Text(_) => 2,
        }
    }

    match (a, b) {
        (Integer(x), Integer(y)) => x.cmp(y),
        (Real(x), Real(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Integer(x), Real(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Real(x), Integer(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Text(_), Text(_)) => a.normalized_key().cmp(&b.normalized_key()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_catalog(category: &str) -> (Connection, SchemaRegistry) {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&registry.create_table_sql(category).unwrap())
            .unwrap();
        (conn, registry)
    }

    #[test]
    fn test_dump_empty_table() {
        let (conn, registry) = fresh_catalog("leds");
        let sql = dump_category(&conn, &registry, "leds").unwrap();
        assert!(sql.contains("-- Number of components: 0\n"));
        assert!(sql.contains("DROP TABLE IF EXISTS leds;"));
        assert!(sql.contains("BEGIN TRANSACTION;"));
        assert!(sql.ends_with("COMMIT;\n"));
    }

    #[test]
    fn test_dump_sorts_by_primary_key() {
        let (conn, registry) = fresh_catalog("resistors");
        conn.execute(
            "INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('RES-0002', 'B', 'G')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('RES-0001', 'A', 'G')",
            [],
        )
        .unwrap();

        let sql = dump_category(&conn, &registry, "resistors").unwrap();
        let first = sql.find("RES-0001").unwrap();
        let second = sql.find("RES-0002").unwrap();
        assert!(first < second);
        assert!(sql.contains("-- Number of components: 2\n"));
    }

    #[test]
    fn test_dump_count_is_recomputed() {
        let (conn, registry) = fresh_catalog("diodes");
        conn.execute(
            "INSERT INTO diodes (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('DIO-0001', 'M', 'G')",
            [],
        )
        .unwrap();
        let sql = dump_category(&conn, &registry, "diodes").unwrap();
        assert!(sql.contains("-- Number of components: 1\n"));

        conn.execute("DELETE FROM diodes", []).unwrap();
        let sql = dump_category(&conn, &registry, "diodes").unwrap();
        assert!(sql.contains("-- Number of components: 0\n"));
    }

    #[test]
    fn test_schema_drift_is_detected() {
        let (conn, registry) = fresh_catalog("switches");
        conn.execute("ALTER TABLE switches ADD COLUMN extra TEXT", [])
            .unwrap();
        let err = dump_category(&conn, &registry, "switches").unwrap_err();
        assert!(matches!(err, CatalogError::SchemaDrift { .. }));
    }

    #[test]
    fn test_missing_table_reports_drift() {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        let err = dump_category(&conn, &registry, "ferrites").unwrap_err();
        assert!(matches!(err, CatalogError::SchemaDrift { .. }));
    }

    #[test]
    fn test_duplicate_key_after_case_folding() {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        // Plain TEXT key so the engine accepts both spellings.
        conn.execute_batch(
            &registry
                .create_table_sql("inductors")
                .unwrap()
                .replace(" COLLATE NOCASE", ""),
        )
        .unwrap();
        conn.execute(
            "INSERT INTO inductors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('ind-0001', 'M', 'G')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO inductors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('IND-0001', 'M', 'G')",
            [],
        )
        .unwrap();

        let err = dump_category(&conn, &registry, "inductors").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { .. }));
    }

    #[test]
    fn test_sort_order_ignores_key_case() {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            &registry
                .create_table_sql("resistors")
                .unwrap()
                .replace(" COLLATE NOCASE", ""),
        )
        .unwrap();
        for part_id in ["res-0002", "RES-0001", "Res-0003"] {
            conn.execute(
                "INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES (?1, 'M', 'G')",
                [part_id],
            )
            .unwrap();
        }

        let sql = dump_category(&conn, &registry, "resistors").unwrap();
        let first = sql.find("RES-0001").unwrap();
        let second = sql.find("res-0002").unwrap();
        let third = sql.find("Res-0003").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_unknown_category_errors() {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        assert!(dump_category(&conn, &registry, "vacuum_tubes").is_err());
    }

    #[test]
    fn test_oreilly_quoting_round_trip() {
        let (conn, registry) = fresh_catalog("capacitors");
        conn.execute(
            "INSERT INTO capacitors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('CAP-0001', 'M', ?1)",
            ["O'Reilly"],
        )
        .unwrap();
        let sql = dump_category(&conn, &registry, "capacitors").unwrap();
        assert!(sql.contains("'O''Reilly'"));
    }
}
