//! Migration error types.

use thiserror::Error;

/// Errors raised while migrating the legacy symbols table.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Reading the legacy database failed.
    #[error("legacy database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A classification rules file could not be read.
    #[error("rules file error: {0}")]
    Io(#[from] std::io::Error),

    /// A classification rules file could not be parsed.
    #[error("rules parse error: {0}")]
    Rules(#[from] serde_yaml::Error),

    /// A category lookup against the registry failed.
    #[error(transparent)]
    Registry(#[from] partdb_core::RegistryError),

    /// A rule names a category the registry does not know.
    #[error("classification rule targets unknown category '{0}'")]
    UnknownRuleTarget(String),

    /// The legacy database has no symbols table.
    #[error("legacy database has no '{0}' table")]
    MissingLegacyTable(String),
}

/// Convenience alias for migration results.
pub type Result<T> = std::result::Result<T, MigrateError>;
