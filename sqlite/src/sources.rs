//! Category SQL file loading and storing.
//!
//! The persisted, version-controlled state is one `.sql` file per category
//! (`<dir>/<category>.sql`). Loading sorts by category name so downstream
//! processing never depends on filesystem enumeration order.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// One category's SQL text, ready for the builder.
#[derive(Debug, Clone)]
pub struct CategorySource {
    /// Category table name (the file stem).
    pub category: String,
    /// Full SQL text: DROP, CREATE, and INSERT statements.
    pub sql: String,
}

/// Loads every `*.sql` file in a directory as a category source.
///
/// The category name is the file stem; results are sorted by category.
/// Non-SQL files are ignored.
///
/// # Errors
///
/// Returns [`crate::CatalogError::Io`] if the directory or a file cannot
/// be read.
pub fn load_sources(dir: impl AsRef<Path>) -> Result<Vec<CategorySource>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let sql = fs::read_to_string(&path)?;
        sources.push(CategorySource {
            category: stem.to_string(),
            sql,
        });
    }
    sources.sort_by(|a, b| a.category.cmp(&b.category));
    debug!(dir = %dir.as_ref().display(), count = sources.len(), "loaded category sources");
    Ok(sources)
}

/// Writes dumped SQL texts to `<dir>/<category>.sql`, creating the
/// directory if needed.
pub fn write_dumps(dir: impl AsRef<Path>, dumps: &[(String, String)]) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    for (category, sql) in dumps {
        fs::write(dir.join(format!("{category}.sql")), sql)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("resistors.sql"), "-- r\n").unwrap();
        fs::write(dir.path().join("capacitors.sql"), "-- c\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sources = load_sources(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["capacitors", "resistors"]);
    }

    #[test]
    fn test_write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let dumps = vec![("leds".to_string(), "-- leds\nCOMMIT;\n".to_string())];
        write_dumps(dir.path(), &dumps).unwrap();

        let sources = load_sources(dir.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].category, "leds");
        assert_eq!(sources[0].sql, "-- leds\nCOMMIT;\n");
    }
}
