//! Round-trip pipeline between category SQL text and the live catalog.
//!
//! The catalog is persisted as one SQL text file per component category and
//! materialized as a SQLite database. This crate is the only bridge between
//! the two representations, in both directions:
//!
//! - **`build`**: replays category SQL texts against a database, one
//!   atomic transaction per table, with partial-failure isolation
//! - **`dump`**: renders a live table back to canonical, byte-deterministic
//!   SQL text (registry column order, rows sorted by primary key)
//! - **`verify`**: runs dump→build into a scratch database and compares
//!   order-independent per-table checksums
//! - **`sources`**: loads and stores the per-category `.sql` files
//!
//! Repeated cycles are idempotent: `dump(build(dump(T)))` equals `dump(T)`
//! byte for byte.
//!
//! # Quick start
//!
//! ```no_run
//! use partdb_core::SchemaRegistry;
//! use partdb_sqlite::{build_catalog, dump_category, load_sources};
//! use rusqlite::Connection;
//!
//! let registry = SchemaRegistry::builtin();
//! let mut conn = Connection::open("catalog.db").unwrap();
//!
//! let sources = load_sources("db/tables/").unwrap();
//! let report = build_catalog(&mut conn, &registry, sources).unwrap();
//! assert!(report.success());
//!
//! let sql = dump_category(&conn, &registry, "resistors").unwrap();
//! println!("{sql}");
//! ```

mod build;
mod checksum;
mod dump;
mod error;
mod sources;
mod statement;
mod verify;

pub use build::{build_catalog, BuildReport, TableBuild, TableBuildStatus};
pub use checksum::table_checksum;
pub use dump::{dump_all, dump_category};
pub use error::{CatalogError, Result};
pub use sources::{load_sources, write_dumps, CategorySource};
pub use statement::split_statements;
pub use verify::{verify_round_trip, TableVerify, VerifyReport, VerifyStatus};
