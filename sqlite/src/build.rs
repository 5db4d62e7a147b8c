//! Building the live database from category SQL text.
//!
//! The builder is the only path from text to database. Each category is
//! replayed inside its own transaction; one broken table rolls back alone
//! and never blocks the rest of the catalog.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use partdb_core::SchemaRegistry;

use crate::error::{CatalogError, Result};
use crate::sources::CategorySource;
use crate::statement::{is_insert, is_transaction_control, split_statements};

/// Outcome of building one category table.
#[derive(Debug, Clone)]
pub struct TableBuild {
    /// Category table name.
    pub category: String,
    /// Rows inserted (zero for schema-only tables).
    pub rows_inserted: usize,
    /// Whether the table built cleanly.
    pub status: TableBuildStatus,
}

/// Per-table build status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBuildStatus {
    /// Table dropped, created, and populated successfully.
    Built,
    /// The table's SQL failed to apply; the transaction rolled back.
    Failed(String),
}

/// Itemized result of a full catalog build.
///
/// Every category appears exactly once; a silent, all-green run is the
/// only success signal.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// One entry per category, in processing (lexicographic) order.
    pub tables: Vec<TableBuild>,
}

impl BuildReport {
    /// `true` when every table built cleanly.
    pub fn success(&self) -> bool {
        self.tables
            .iter()
            .all(|t| t.status == TableBuildStatus::Built)
    }

    /// Total rows inserted across all built tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows_inserted).sum()
    }
}

/// Replays category SQL sources against a database.
///
/// Sources are processed in lexicographic category order regardless of the
/// order given, so the result never depends on filesystem enumeration. For
/// each category the DROP/CREATE/INSERT statements run as one atomic
/// transaction; a failure rolls back that table only and is recorded in
/// the report while processing continues. After each table commits, the
/// row count is validated against the number of INSERT statements
/// consumed to detect silent truncation.
///
/// # Errors
///
/// Returns [`CatalogError::Registry`] if a source names an unregistered
/// category; that is a configuration bug and fatal to the run. Per-table
/// SQL failures are *not* errors here; they surface in the report.
pub fn build_catalog(
    conn: &mut Connection,
    registry: &SchemaRegistry,
    mut sources: Vec<CategorySource>,
) -> Result<BuildReport> {
    sources.sort_by(|a, b| a.category.cmp(&b.category));

    for source in &sources {
        if !registry.contains(&source.category) {
            return Err(partdb_core::RegistryError::UnknownCategory(source.category.clone()).into());
        }
    }

    let mut report = BuildReport::default();
    for source in &sources {
        let outcome = match build_table(conn, source) {
            Ok(rows_inserted) => {
                info!(category = %source.category, rows = rows_inserted, "table built");
                TableBuild {
                    category: source.category.clone(),
                    rows_inserted,
                    status: TableBuildStatus::Built,
                }
            }
            Err(err) => {
                warn!(category = %source.category, error = %err, "table build failed, rolled back");
                TableBuild {
                    category: source.category.clone(),
                    rows_inserted: 0,
                    status: TableBuildStatus::Failed(err.to_string()),
                }
            }
        };
        report.tables.push(outcome);
    }
    Ok(report)
}

/// Builds one table atomically, returning the rows inserted.
fn build_table(conn: &mut Connection, source: &CategorySource) -> Result<usize> {
    let statements = split_statements(&source.sql);
    let tx = conn.transaction().map_err(CatalogError::Database)?;

    let mut inserts = 0usize;
    for stmt in &statements {
        // The file's own BEGIN/COMMIT wrapper is dropped; this transaction
        // is the atomicity boundary.
        if is_transaction_control(stmt) {
            continue;
        }
        if let Err(err) = tx.execute(stmt, []) {
            return Err(CatalogError::Build {
                category: source.category.clone(),
                cause: err.to_string(),
            });
        }
        if is_insert(stmt) {
            inserts += 1;
        }
    }

    let rows: usize = tx
        .query_row(
            &format!("SELECT COUNT(*) FROM {}", source.category),
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n as usize)
        .map_err(|err| CatalogError::Build {
            category: source.category.clone(),
            cause: err.to_string(),
        })?;

    if rows != inserts {
        return Err(CatalogError::Integrity {
            category: source.category.clone(),
            inserts,
            rows,
        });
    }

    debug!(category = %source.category, statements = statements.len(), "committing table");
    tx.commit().map_err(CatalogError::Database)?;
    Ok(inserts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(category: &str, sql: &str) -> CategorySource {
        CategorySource {
            category: category.to_string(),
            sql: sql.to_string(),
        }
    }

    fn resistor_source(registry: &SchemaRegistry, inserts: &[&str]) -> CategorySource {
        let mut sql = String::new();
        sql.push_str(&registry.drop_table_sql("resistors").unwrap());
        sql.push('\n');
        sql.push_str(&registry.create_table_sql("resistors").unwrap());
        sql.push_str("\nBEGIN TRANSACTION;\n");
        for part_id in inserts {
            sql.push_str(&format!(
                "INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('{part_id}', 'M', 'G');\n"
            ));
        }
        sql.push_str("COMMIT;\n");
        source("resistors", &sql)
    }

    #[test]
    fn test_build_empty_schema_only_table() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();
        let report =
            build_catalog(&mut conn, &registry, vec![resistor_source(&registry, &[])]).unwrap();
        assert!(report.success());
        assert_eq!(report.tables[0].rows_inserted, 0);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM resistors", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_build_inserts_rows() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();
        let report = build_catalog(
            &mut conn,
            &registry,
            vec![resistor_source(&registry, &["RES-0001", "RES-0002"])],
        )
        .unwrap();
        assert!(report.success());
        assert_eq!(report.total_rows(), 2);
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();
        let result = build_catalog(
            &mut conn,
            &registry,
            vec![source("vacuum_tubes", "CREATE TABLE vacuum_tubes (\"a\" TEXT);")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_table_rolls_back_alone() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();
        let broken = source("capacitors", "CREATE TABLE capacitors (this is not sql;");
        let good = resistor_source(&registry, &["RES-0001"]);

        let report = build_catalog(&mut conn, &registry, vec![broken, good]).unwrap();
        assert!(!report.success());

        // capacitors sorts first
        assert!(matches!(
            report.tables[0].status,
            TableBuildStatus::Failed(_)
        ));
        assert_eq!(report.tables[1].status, TableBuildStatus::Built);

        // The good table is intact despite the broken one.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM resistors", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_row_count_mismatch_fails_the_table() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();

        // Two INSERT OR REPLACE statements on the same key leave one row
        // behind, tripping the insert-count check.
        let mut sql = String::new();
        sql.push_str(&registry.create_table_sql("leds").unwrap());
        sql.push_str(
            "\nINSERT OR REPLACE INTO leds (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('LED-0001', 'A', 'G');\n\
             INSERT OR REPLACE INTO leds (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('LED-0001', 'B', 'G');\n",
        );

        let report = build_catalog(&mut conn, &registry, vec![source("leds", &sql)]).unwrap();
        assert!(!report.success());
        match &report.tables[0].status {
            TableBuildStatus::Failed(cause) => assert!(cause.contains("row count mismatch")),
            TableBuildStatus::Built => panic!("expected failure"),
        }
    }

    #[test]
    fn test_sources_are_processed_in_lexicographic_order() {
        let registry = SchemaRegistry::builtin();
        let mut conn = Connection::open_in_memory().unwrap();
        let a = resistor_source(&registry, &[]);
        let mut b_sql = String::new();
        b_sql.push_str(&registry.drop_table_sql("capacitors").unwrap());
        b_sql.push('\n');
        b_sql.push_str(&registry.create_table_sql("capacitors").unwrap());
        let b = source("capacitors", &b_sql);

        // Given resistors first, the report still lists capacitors first.
        let report = build_catalog(&mut conn, &registry, vec![a, b]).unwrap();
        assert_eq!(report.tables[0].category, "capacitors");
        assert_eq!(report.tables[1].category, "resistors");
    }
}
