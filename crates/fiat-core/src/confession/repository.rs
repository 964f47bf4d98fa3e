//! Confession repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{ConfessionDraft, ConfessionPatch, ConfessionRecord};
use crate::error::Result;

/// An abstract repository for confession records owned by the signed-in user.
///
/// `get`, `update`, `mark_confessed` and `delete` fail with
/// `FiatError::NotFound` when the row does not exist or is not visible to the caller.
#[async_trait]
pub trait ConfessionRepository: Send + Sync {
    /// Lists records newest-first by creation time, at most `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<ConfessionRecord>>;

    async fn create(&self, draft: &ConfessionDraft) -> Result<ConfessionRecord>;

    async fn get(&self, id: Uuid) -> Result<ConfessionRecord>;

    async fn update(&self, id: Uuid, patch: &ConfessionPatch) -> Result<ConfessionRecord>;

    /// Sets `confessed_at` and `notes_after`, overwriting earlier values.
    async fn mark_confessed(
        &self,
        id: Uuid,
        notes_after: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<ConfessionRecord>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
