//! Core data model for the component catalog round-trip pipeline.
//!
//! The catalog is version-controlled as SQL text (one file per component
//! category) and queried as a live SQLite database. Building the database
//! from text and dumping it back must reproduce byte-identical SQL, so
//! everything that feeds the dump path lives here as pure, deterministic
//! data:
//!
//! - **`value`**: the canonical cell value model ([`SqlValue`])
//! - **`registry`**: the per-category column catalog ([`SchemaRegistry`])
//! - **`render`**: canonical SQL literal and statement rendering
//! - **`state`**: the text-authoritative/db-ahead sync contract
//!
//! # Quick start
//!
//! ```
//! use partdb_core::{SchemaRegistry, SqlValue, render_literal};
//!
//! let registry = SchemaRegistry::builtin();
//! let columns = registry.columns_for("resistors").unwrap();
//! assert_eq!(columns[0].name, "part_id");
//!
//! assert_eq!(render_literal(&SqlValue::Text("O'Reilly".into())), "'O''Reilly'");
//! ```

mod error;
mod registry;
mod render;
mod state;
mod value;

pub use error::RegistryError;
pub use registry::{ColumnDef, ColumnType, SchemaRegistry, CORE_COLUMN_COUNT};
pub use render::{render_insert, render_literal};
pub use state::SyncState;
pub use value::SqlValue;
