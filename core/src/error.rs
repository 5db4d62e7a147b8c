//! Error types for registry lookups.

use thiserror::Error;

/// Errors raised by the schema registry.
///
/// A lookup miss is a configuration bug, not a data condition: every
/// category the pipeline touches must be registered at authoring time.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested category table is not registered.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
