//! One-shot migration from the legacy flat `symbols` table into
//! per-category tables.
//!
//! The legacy layout kept every component in one wide TEXT table. This
//! crate classifies each row by reference designator (refining ICs by
//! description and component type), maps legacy fields onto the registry
//! columns, and emits buildable seed SQL per category. Rows no rule can
//! place are reported, never guessed into a bucket.
//!
//! The output is meant to be fed through the build pipeline and then
//! re-dumped, which canonicalizes formatting and row order.

mod categorize;
mod error;
mod legacy;
mod mapping;
mod rules;

pub use categorize::{categorize, Categorized};
pub use error::{MigrateError, Result};
pub use legacy::{read_symbols, LegacyRow, LEGACY_TABLE};
pub use mapping::{generate_part_id, normalize_boolean, render_bucket};
pub use rules::{ClassificationRules, Classifier, IcRule};

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::info;

use partdb_core::SchemaRegistry;

/// Result of a migration run.
#[derive(Debug)]
pub struct Migration {
    /// Seed SQL per category, lexicographic order, buildable as-is.
    pub sources: Vec<(String, String)>,
    /// Rows placed into a category.
    pub migrated: usize,
    /// Symbol names no rule matched, in input order.
    pub unclassified: Vec<String>,
}

/// Migrates the legacy symbols table, stamping rows with the current time.
pub fn migrate_legacy(
    conn: &Connection,
    registry: &SchemaRegistry,
    rules: ClassificationRules,
) -> Result<Migration> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    migrate_legacy_at(conn, registry, rules, &timestamp)
}

/// Migrates the legacy symbols table with an explicit timestamp.
pub fn migrate_legacy_at(
    conn: &Connection,
    registry: &SchemaRegistry,
    rules: ClassificationRules,
    timestamp: &str,
) -> Result<Migration> {
    let classifier = Classifier::new(rules, registry)?;
    let rows = read_symbols(conn)?;
    let total = rows.len();
    let categorized = categorize(rows, &classifier);

    let mut sources = Vec::with_capacity(categorized.buckets.len());
    let mut migrated = 0usize;
    for (category, bucket) in &categorized.buckets {
        sources.push((
            category.clone(),
            render_bucket(registry, category, bucket, timestamp)?,
        ));
        migrated += bucket.len();
    }

    let unclassified: Vec<String> = categorized
        .unclassified
        .iter()
        .map(|r| r.get("Symbol_Name").unwrap_or("?").to_string())
        .collect();

    info!(
        total,
        migrated,
        unclassified = unclassified.len(),
        categories = sources.len(),
        "legacy migration complete"
    );
    Ok(Migration {
        sources,
        migrated,
        unclassified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2026-08-29T12:00:00Z";

    fn legacy_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE symbols (
                 Symbol_Name TEXT, Reference TEXT, Description TEXT,
                 Component_Type TEXT, Value TEXT, MPN TEXT, Manufacturer TEXT,
                 RoHS TEXT
             );
             INSERT INTO symbols VALUES
                 ('R_10K_0402', 'R', '10K resistor', 'thick film', '10K', 'RC0402FR-0710KL', 'Yageo', 'YES'),
                 ('U_LM358', 'U', 'Dual op-amp', 'opamp', NULL, 'LM358', 'TI', 'YES'),
                 ('X_8MHZ', 'X', '8MHz crystal', 'crystal', '8MHz', NULL, NULL, NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_migration_splits_and_reports() {
        let conn = legacy_db();
        let registry = SchemaRegistry::builtin();
        let result =
            migrate_legacy_at(&conn, &registry, ClassificationRules::default(), TS).unwrap();

        assert_eq!(result.migrated, 2);
        assert_eq!(result.unclassified, vec!["X_8MHZ"]);

        let categories: Vec<&str> = result.sources.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, vec!["ic_opamp", "resistors"]);

        let (_, resistor_sql) = result
            .sources
            .iter()
            .find(|(c, _)| c == "resistors")
            .unwrap();
        assert!(resistor_sql.contains("'R_10K_0402'"));
        assert!(resistor_sql.contains("'RC0402FR-0710KL'"));
        assert!(resistor_sql.contains(&format!("'{TS}'")));
    }

    #[test]
    fn test_migration_output_builds_cleanly() {
        let conn = legacy_db();
        let registry = SchemaRegistry::builtin();
        let result =
            migrate_legacy_at(&conn, &registry, ClassificationRules::default(), TS).unwrap();

        let target = Connection::open_in_memory().unwrap();
        for (_, sql) in &result.sources {
            target.execute_batch(sql).unwrap();
        }
        let count: i64 = target
            .query_row("SELECT COUNT(*) FROM resistors", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let mpn: String = target
            .query_row("SELECT \"mpn\" FROM ic_opamp WHERE \"part_id\" = 'U_LM358'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(mpn, "LM358");
    }
}
