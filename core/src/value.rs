//! Canonical cell value model.
//!
//! A catalog cell is one of four states: SQL NULL, an integer, a real, or
//! text. Booleans are stored the SQLite way, as integer `0`/`1`. NULL,
//! empty string, and populated text are three *distinct* states and must
//! survive every dump/build cycle unconflated.

use serde::{Deserialize, Serialize};

/// A single cell value as it travels between SQL text and the database.
///
/// # Examples
///
/// ```
/// use partdb_core::SqlValue;
///
/// let null = SqlValue::Null;
/// let empty = SqlValue::Text(String::new());
/// assert_ne!(null, empty); // NULL and '' are different states
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// 64-bit integer (also carries booleans as 0/1).
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// Text, possibly empty.
    Text(String),
}

impl SqlValue {
    /// Returns `true` for [`SqlValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Builds a boolean cell using the SQLite 0/1 convention.
    pub fn bool(b: bool) -> Self {
        SqlValue::Integer(i64::from(b))
    }

    /// Key normalization used for primary-key sorting and duplicate
    /// detection. Part IDs collate NOCASE, so text keys fold case.
    pub fn normalized_key(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(n) => n.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(s) => s.to_uppercase(),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => SqlValue::Text(s),
            None => SqlValue::Null,
        }
    }
}
