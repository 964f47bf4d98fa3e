//! Journal use cases.

use std::sync::Arc;

use fiat_core::Result;
use fiat_core::journal::{EntryId, JournalDraft, JournalEntry, JournalRepository};
use tracing::info;

/// CRUD over journal entries in a single store, no fallback.
#[derive(Clone)]
pub struct JournalService {
    repository: Arc<dyn JournalRepository>,
    list_limit: usize,
}

impl JournalService {
    pub fn new(repository: Arc<dyn JournalRepository>, list_limit: usize) -> Self {
        Self {
            repository,
            list_limit,
        }
    }

    /// Newest entries first, up to the configured limit.
    pub async fn list(&self) -> Result<Vec<JournalEntry>> {
        self.repository.list(self.list_limit).await
    }

    pub async fn create(&self, title: &str, body: Option<&str>) -> Result<JournalEntry> {
        let draft = JournalDraft::new(title, body)?;
        let entry = self.repository.create(&draft).await?;
        info!("Created journal entry {}", entry.id);
        Ok(entry)
    }

    pub async fn get(&self, id: &str) -> Result<JournalEntry> {
        self.repository.get(&EntryId::new(id)).await
    }

    /// Replaces title and body of entry `id`.
    pub async fn update(&self, id: &str, title: &str, body: Option<&str>) -> Result<JournalEntry> {
        let draft = JournalDraft::new(title, body)?;
        self.repository.update(&EntryId::new(id), &draft).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = EntryId::new(id);
        self.repository.delete(&id).await?;
        info!("Deleted journal entry {}", id);
        Ok(())
    }
}
