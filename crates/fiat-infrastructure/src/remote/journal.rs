use async_trait::async_trait;
use fiat_core::journal::{EntryId, JournalDraft, JournalEntry, JournalRepository};
use fiat_core::{FiatError, Result};

use super::client::{Access, RemoteClient};
use super::query::RowQuery;
use super::rows::{JournalChanges, JournalInsert, JournalRow};

const TABLE: &str = "journal_entries";
const COLUMNS: &str = "id,title,body,created_at";
const ENTITY: &str = "Journal entry";

/// Journal entries in the hosted `journal_entries` table. Row ownership is
/// enforced by the backend; rows of other users are simply invisible.
#[derive(Clone)]
pub struct RemoteJournalRepository {
    client: RemoteClient,
}

impl RemoteJournalRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    fn by_id(id: &EntryId) -> RowQuery {
        RowQuery::new().select(COLUMNS).eq("id", id)
    }

    fn single(rows: Vec<JournalRow>, id: &EntryId) -> Result<JournalEntry> {
        rows.into_iter()
            .next()
            .map(JournalEntry::from)
            .ok_or_else(|| FiatError::not_found(ENTITY, id.as_str()))
    }
}

#[async_trait]
impl JournalRepository for RemoteJournalRepository {
    async fn list(&self, limit: usize) -> Result<Vec<JournalEntry>> {
        let query = RowQuery::new()
            .select(COLUMNS)
            .order("created_at", false)
            .limit(limit);
        let rows: Vec<JournalRow> = self.client.select(TABLE, &query, Access::User).await?;
        Ok(rows.into_iter().map(JournalEntry::from).collect())
    }

    async fn create(&self, draft: &JournalDraft) -> Result<JournalEntry> {
        let session = self.client.require_session()?;
        let body = JournalInsert {
            user_id: session.user_id(),
            title: &draft.title,
            body: draft.body.as_deref(),
        };
        let query = RowQuery::new().select(COLUMNS);
        let rows: Vec<JournalRow> = self.client.insert(TABLE, &[body], &query, Access::User).await?;
        rows.into_iter()
            .next()
            .map(JournalEntry::from)
            .ok_or_else(|| FiatError::internal("insert into journal_entries returned no row"))
    }

    async fn get(&self, id: &EntryId) -> Result<JournalEntry> {
        let rows = self
            .client
            .select(TABLE, &Self::by_id(id).limit(1), Access::User)
            .await?;
        Self::single(rows, id)
    }

    async fn update(&self, id: &EntryId, draft: &JournalDraft) -> Result<JournalEntry> {
        let changes = JournalChanges {
            title: &draft.title,
            body: draft.body.as_deref(),
        };
        let rows = self.client.update(TABLE, &changes, &Self::by_id(id)).await?;
        Self::single(rows, id)
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let rows: Vec<JournalRow> = self.client.delete(TABLE, &Self::by_id(id)).await?;
        if rows.is_empty() {
            return Err(FiatError::not_found(ENTITY, id.as_str()));
        }
        tracing::debug!("Deleted journal entry {}", id);
        Ok(())
    }
}
