//! Canonical SQL rendering.
//!
//! Every literal the pipeline emits goes through this module, so the same
//! row content always renders to the same bytes: NULL is the bare keyword,
//! text is single-quoted with embedded quotes doubled, integers are plain
//! decimal, and reals use the shortest round-trippable form with a
//! mandatory decimal point so a REAL literal can never be re-read as an
//! INTEGER.

use crate::value::SqlValue;

/// Renders a single value as a canonical SQL literal.
///
/// # Examples
///
/// ```
/// use partdb_core::{render_literal, SqlValue};
///
/// assert_eq!(render_literal(&SqlValue::Null), "NULL");
/// assert_eq!(render_literal(&SqlValue::Text(String::new())), "''");
/// assert_eq!(render_literal(&SqlValue::Text("O'Reilly".into())), "'O''Reilly'");
/// assert_eq!(render_literal(&SqlValue::Real(2.5)), "2.5");
/// assert_eq!(render_literal(&SqlValue::Real(1.0)), "1.0");
/// ```
pub fn render_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Integer(n) => n.to_string(),
        SqlValue::Real(f) => render_real(*f),
        SqlValue::Text(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('\'');
            for ch in s.chars() {
                if ch == '\'' {
                    out.push('\'');
                }
                out.push(ch);
            }
            out.push('\'');
            out
        }
    }
}

/// SQLite cannot store non-finite reals; they degrade to NULL rather than
/// producing an unparseable literal.
fn render_real(f: f64) -> String {
    if !f.is_finite() {
        return "NULL".to_string();
    }
    let s = f.to_string();
    // Rust's Display already yields the shortest round-trippable decimal;
    // integral values still need a point to keep REAL distinct from INTEGER.
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Renders one row as a canonical INSERT statement.
///
/// All columns are named explicitly; positional `VALUES` form is never
/// emitted, so a future column reorder cannot silently misalign data.
pub fn render_insert(table: &str, columns: &[&str], values: &[SqlValue]) -> String {
    debug_assert_eq!(columns.len(), values.len());
    let column_list = columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let value_list = values
        .iter()
        .map(render_literal)
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {table} ({column_list}) VALUES ({value_list});")
}
