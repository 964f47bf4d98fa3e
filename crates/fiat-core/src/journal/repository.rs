//! Journal repository trait.
//!
//! Defines the interface for journal entry persistence operations.

use async_trait::async_trait;

use super::model::{EntryId, JournalDraft, JournalEntry};
use crate::error::Result;

/// An abstract repository for journal entries.
///
/// Implemented by the remote `journal_entries` table (scoped to the signed-in
/// user) and by the on-device `entries` table.
///
/// # Implementation Notes
///
/// - `get`, `update` and `delete` fail with `FiatError::NotFound` when the row
///   does not exist or is not visible to the caller
/// - drafts are already validated; implementations store them as given
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Lists entries newest-first, at most `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<JournalEntry>>;

    /// Creates an entry and returns the stored row.
    async fn create(&self, draft: &JournalDraft) -> Result<JournalEntry>;

    /// Finds an entry by id.
    async fn get(&self, id: &EntryId) -> Result<JournalEntry>;

    /// Replaces title and body of an existing entry.
    async fn update(&self, id: &EntryId, draft: &JournalDraft) -> Result<JournalEntry>;

    /// Permanently deletes an entry.
    async fn delete(&self, id: &EntryId) -> Result<()>;
}
