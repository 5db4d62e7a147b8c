//! Error types for the dump/build/verify pipeline.
//!
//! Per-table failures (a broken build, a duplicate key) are isolated to
//! their table and surfaced in reports; cross-table failures (registry
//! misses, schema drift) are fatal to the whole run because they mean the
//! premises of determinism no longer hold.

use partdb_core::RegistryError;
use thiserror::Error;

/// Errors that can occur during catalog pipeline operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// SQLite operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Registry lookup miss; a configuration bug, fatal to the run.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// File I/O failure while reading or writing category SQL files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The live table's columns disagree with the registry. Requires an
    /// explicit schema-evolution step before a dump can proceed.
    #[error("schema drift in table '{category}': registry declares [{expected}] but database has [{actual}]")]
    SchemaDrift {
        category: String,
        expected: String,
        actual: String,
    },

    /// Two rows share a primary key after normalization; the dump for
    /// that table aborts rather than silently picking one.
    #[error("duplicate primary key '{key}' in table '{category}'")]
    DuplicateKey { category: String, key: String },

    /// A single table's SQL failed to apply; that table rolled back.
    #[error("build failed for table '{category}': {cause}")]
    Build { category: String, cause: String },

    /// Post-build row count disagrees with the INSERT statements consumed,
    /// signalling silent data loss.
    #[error("row count mismatch in table '{category}': {inserts} inserts but {rows} rows")]
    Integrity {
        category: String,
        inserts: usize,
        rows: usize,
    },

    /// The catalog never stores BLOBs; finding one means the database was
    /// mutated outside the pipeline.
    #[error("unsupported BLOB value in table '{category}', column '{column}'")]
    UnsupportedBlob { category: String, column: String },
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
