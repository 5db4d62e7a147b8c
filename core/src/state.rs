//! Text-authoritative sync contract.
//!
//! The SQL text under version control is the source of truth; the database
//! is a derived artifact. Editing the database puts the workflow in a
//! transient `DbAheadOfText` state, and dumping is the only transition
//! back. The builder is the only text-to-database path, the dumper the
//! only database-to-text path.
//!
//! The library itself is stateless: nothing in the build or dump pipeline
//! reads [`SyncState`]. It is the contract type for callers that persist
//! workflow state alongside the catalog, such as a pre-commit hook or CI
//! step recording whether a dump is still pending, which is why it
//! serializes.

use serde::{Deserialize, Serialize};

/// Where the authoritative copy of the catalog currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyncState {
    /// The SQL text files match the database; text is authoritative.
    #[default]
    TextAuthoritative,
    /// The database has been edited and must be dumped before the text
    /// can be trusted again.
    DbAheadOfText,
}

impl SyncState {
    /// Records a database edit.
    pub fn edit_db(self) -> Self {
        SyncState::DbAheadOfText
    }

    /// Records a completed dump, returning to the synced state.
    pub fn dump(self) -> Self {
        SyncState::TextAuthoritative
    }

    /// Returns `true` when the text files can be trusted as-is.
    pub fn text_is_authoritative(self) -> bool {
        self == SyncState::TextAuthoritative
    }
}
