//! Round-trip verification.
//!
//! For each table: checksum the current database, run dump→build into a
//! scratch in-memory database, checksum the rebuilt copy, and compare.
//! Checksums are order-independent, so the check catches content drift
//! rather than incidental row-fetch ordering. All tables are checked even
//! after a failure; the report itemizes every one.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use partdb_core::SchemaRegistry;

use crate::build::{build_catalog, TableBuildStatus};
use crate::checksum::table_checksum;
use crate::dump::dump_category;
use crate::error::{CatalogError, Result};
use crate::sources::CategorySource;

/// Per-table verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Checksums match; the table round-trips.
    Pass,
    /// Checksums differ, or the table's own dump→build cycle failed.
    Fail,
}

/// One table's verification result, with both digests for diagnosis.
#[derive(Debug, Clone)]
pub struct TableVerify {
    /// Category table name.
    pub category: String,
    /// Digest of the current database.
    pub checksum_before: String,
    /// Digest of the dump→build rebuilt snapshot; absent when the cycle
    /// itself failed for this table.
    pub checksum_after: Option<String>,
    /// Why the cycle failed, for tables without a rebuilt digest.
    pub cause: Option<String>,
    /// PASS/FAIL.
    pub status: VerifyStatus,
}

/// Itemized round-trip verification report.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// One entry per category, lexicographic order.
    pub tables: Vec<TableVerify>,
}

impl VerifyReport {
    /// `true` when every table passed.
    pub fn success(&self) -> bool {
        self.tables.iter().all(|t| t.status == VerifyStatus::Pass)
    }

    /// Number of failing tables.
    pub fn failures(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| t.status == VerifyStatus::Fail)
            .count()
    }
}

/// Verifies that every registered table survives a dump→build cycle.
///
/// The rebuilt snapshot lives in a scratch in-memory database and is
/// discarded regardless of outcome. Failures are confined to their table:
/// a checksum mismatch, a duplicate key, or a rebuild failure marks that
/// table FAIL and verification moves on to the next category. Registry
/// misses and schema drift abort the run because the premises of
/// determinism have failed.
pub fn verify_round_trip(conn: &Connection, registry: &SchemaRegistry) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    for category in registry.categories() {
        let checksum_before = table_checksum(conn, registry, category)?;

        let entry = match rebuilt_checksum(conn, registry, category) {
            Ok(checksum_after) => {
                let status = if checksum_before == checksum_after {
                    VerifyStatus::Pass
                } else {
                    VerifyStatus::Fail
                };
                TableVerify {
                    category: category.to_string(),
                    checksum_before,
                    checksum_after: Some(checksum_after),
                    cause: None,
                    status,
                }
            }
            Err(err @ (CatalogError::DuplicateKey { .. } | CatalogError::Build { .. })) => {
                warn!(category, error = %err, "round-trip cycle failed for table");
                TableVerify {
                    category: category.to_string(),
                    checksum_before,
                    checksum_after: None,
                    cause: Some(err.to_string()),
                    status: VerifyStatus::Fail,
                }
            }
            Err(err) => return Err(err),
        };

        debug!(category, status = ?entry.status, "round-trip check");
        report.tables.push(entry);
    }

    info!(
        tables = report.tables.len(),
        failures = report.failures(),
        "round-trip verification finished"
    );
    Ok(report)
}

/// Dumps one table, rebuilds it in a scratch database, and returns the
/// rebuilt digest.
fn rebuilt_checksum(
    conn: &Connection,
    registry: &SchemaRegistry,
    category: &str,
) -> Result<String> {
    let sql = dump_category(conn, registry, category)?;

    let mut scratch = Connection::open_in_memory()?;
    let build = build_catalog(
        &mut scratch,
        registry,
        vec![CategorySource {
            category: category.to_string(),
            sql,
        }],
    )?;
    if let Some(TableBuildStatus::Failed(cause)) = build.tables.first().map(|t| t.status.clone()) {
        return Err(CatalogError::Build {
            category: category.to_string(),
            cause,
        });
    }

    table_checksum(&scratch, registry, category)
}
