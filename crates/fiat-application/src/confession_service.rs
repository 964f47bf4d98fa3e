//! Confession planning use cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fiat_core::Result;
use fiat_core::confession::{
    ConfessionDraft, ConfessionPatch, ConfessionRecord, ConfessionRepository, parse_confession_id,
};
use tracing::info;

/// Confession records in the remote store.
///
/// Dates and ids arrive as user text and are parsed here, before the
/// repository sees them.
#[derive(Clone)]
pub struct ConfessionService {
    repository: Arc<dyn ConfessionRepository>,
    list_limit: usize,
}

impl ConfessionService {
    pub fn new(repository: Arc<dyn ConfessionRepository>, list_limit: usize) -> Self {
        Self {
            repository,
            list_limit,
        }
    }

    pub async fn list(&self) -> Result<Vec<ConfessionRecord>> {
        self.repository.list(self.list_limit).await
    }

    /// Plans a confession. `planned_date` must be `YYYY-MM-DD` when given.
    pub async fn create(
        &self,
        planned_date: Option<&str>,
        notes_before: Option<&str>,
    ) -> Result<ConfessionRecord> {
        let draft = ConfessionDraft::from_input(planned_date, notes_before)?;
        let record = self.repository.create(&draft).await?;
        info!("Planned confession {}", record.id);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<ConfessionRecord> {
        self.repository.get(parse_confession_id(id)?).await
    }

    /// Replaces the editable fields of record `id`. Blank input clears a field.
    pub async fn update(
        &self,
        id: &str,
        planned_date: Option<&str>,
        notes_before: Option<&str>,
        notes_after: Option<&str>,
    ) -> Result<ConfessionRecord> {
        let id = parse_confession_id(id)?;
        let patch = ConfessionPatch::from_input(planned_date, notes_before, notes_after)?;
        self.repository.update(id, &patch).await
    }

    /// Records the confession as done at `at`. Repeating the call overwrites
    /// the previous time and notes.
    pub async fn mark_confessed(
        &self,
        id: &str,
        notes_after: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<ConfessionRecord> {
        let id = parse_confession_id(id)?;
        let notes_after = notes_after.filter(|n| !n.trim().is_empty());
        let record = self.repository.mark_confessed(id, notes_after, at).await?;
        info!("Confession {} marked done at {}", id, at);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_confession_id(id)?;
        self.repository.delete(id).await?;
        info!("Deleted confession {}", id);
        Ok(())
    }
}
