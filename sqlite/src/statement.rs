//! SQL text splitting.
//!
//! Category SQL files carry their own `BEGIN TRANSACTION`/`COMMIT` wrapper
//! so they stay directly pipeable into the `sqlite3` shell. The builder
//! manages transactions itself, so it needs the individual statements with
//! the transaction control filtered out. The splitter respects
//! single-quoted strings (with `''` escapes), `--` line comments, and
//! `/* */` block comments.

/// Splits SQL text into individual statements, comments stripped.
///
/// Statement boundaries are `;` characters outside string literals and
/// comments. Empty statements are dropped.
///
/// # Examples
///
/// ```
/// use partdb_sqlite::split_statements;
///
/// let stmts = split_statements("-- header\nINSERT INTO t (\"a\") VALUES ('x;y');\n");
/// assert_eq!(stmts, vec!["INSERT INTO t (\"a\") VALUES ('x;y')"]);
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            current.push(ch);
            if ch == '\'' {
                // A doubled quote stays inside the literal.
                if chars.peek() == Some(&'\'') {
                    current.push('\'');
                    chars.next();
                } else {
                    in_string = false;
                }
            }
            continue;
        }

        match ch {
            '\'' => {
                in_string = true;
                current.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                current.push(' ');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                current.push(' ');
            }
            ';' => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    statements
}

/// Returns `true` for `BEGIN`/`COMMIT`/`END` transaction control.
pub(crate) fn is_transaction_control(stmt: &str) -> bool {
    let upper = stmt.trim_start().to_uppercase();
    upper.starts_with("BEGIN") || upper.starts_with("COMMIT") || upper.starts_with("END")
}

/// Returns `true` for INSERT statements; used for the integrity count.
pub(crate) fn is_insert(stmt: &str) -> bool {
    stmt.trim_start().to_uppercase().starts_with("INSERT")
}
