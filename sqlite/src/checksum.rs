//! Order-independent table content checksums.
//!
//! Used only by the verifier, never persisted. Each row renders to its
//! canonical literal form, the renderings are sorted, and the sorted
//! sequence is hashed, so the digest depends on row content alone and not
//! on the engine's fetch order.

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use partdb_core::{render_literal, SchemaRegistry};

use crate::dump::{check_schema_drift, read_table_rows};
use crate::error::Result;

/// Field and record separators keep `("a","bc")` and `("ab","c")` distinct.
const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Computes the order-independent SHA-256 content digest of one table.
///
/// # Errors
///
/// Fails with [`crate::CatalogError::SchemaDrift`] if the live table does
/// not match the registry, or [`crate::CatalogError::Registry`] for an
/// unregistered category.
pub fn table_checksum(
    conn: &Connection,
    registry: &SchemaRegistry,
    category: &str,
) -> Result<String> {
    let columns = registry.columns_for(category)?;
    check_schema_drift(conn, category, columns)?;
    let rows = read_table_rows(conn, category, columns)?;

    let mut rendered: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(render_literal)
                .collect::<Vec<_>>()
                .join(&FIELD_SEP.to_string())
        })
        .collect();
    rendered.sort_unstable();

    let mut payload = String::new();
    for row in &rendered {
        payload.push_str(row);
        payload.push(RECORD_SEP);
    }
    Ok(format!("{:x}", Sha256::digest(payload.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(category: &str) -> (Connection, SchemaRegistry) {
        let registry = SchemaRegistry::builtin();
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&registry.create_table_sql(category).unwrap())
            .unwrap();
        (conn, registry)
    }

    #[test]
    fn test_checksum_is_insertion_order_independent() {
        let (a, registry) = setup("resistors");
        a.execute("INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('R-1', 'M', 'G')", []).unwrap();
        a.execute("INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('R-2', 'N', 'G')", []).unwrap();

        let (b, _) = setup("resistors");
        b.execute("INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('R-2', 'N', 'G')", []).unwrap();
        b.execute("INSERT INTO resistors (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('R-1', 'M', 'G')", []).unwrap();

        assert_eq!(
            table_checksum(&a, &registry, "resistors").unwrap(),
            table_checksum(&b, &registry, "resistors").unwrap()
        );
    }

    #[test]
    fn test_checksum_distinguishes_null_from_empty() {
        let (a, registry) = setup("leds");
        a.execute("INSERT INTO leds (\"part_id\", \"mpn\", \"manufacturer\", \"description\") VALUES ('L-1', 'M', 'G', NULL)", []).unwrap();

        let (b, _) = setup("leds");
        b.execute("INSERT INTO leds (\"part_id\", \"mpn\", \"manufacturer\", \"description\") VALUES ('L-1', 'M', 'G', '')", []).unwrap();

        assert_ne!(
            table_checksum(&a, &registry, "leds").unwrap(),
            table_checksum(&b, &registry, "leds").unwrap()
        );
    }

    #[test]
    fn test_checksum_changes_with_content() {
        let (conn, registry) = setup("diodes");
        let before = table_checksum(&conn, &registry, "diodes").unwrap();
        conn.execute("INSERT INTO diodes (\"part_id\", \"mpn\", \"manufacturer\") VALUES ('D-1', 'M', 'G')", []).unwrap();
        let after = table_checksum(&conn, &registry, "diodes").unwrap();
        assert_ne!(before, after);
    }
}
