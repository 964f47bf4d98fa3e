use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fiat_core::confession::{
    ConfessionDraft, ConfessionPatch, ConfessionRecord, ConfessionRepository,
};
use fiat_core::{FiatError, Result};
use serde::Serialize;
use uuid::Uuid;

use super::client::{Access, RemoteClient};
use super::query::RowQuery;

const TABLE: &str = "confessions";
const COLUMNS: &str = "id,planned_date,notes_before,confessed_at,notes_after,created_at";
const ENTITY: &str = "Confession";

#[derive(Serialize)]
struct ConfessionInsert<'a> {
    user_id: &'a str,
    planned_date: Option<NaiveDate>,
    notes_before: Option<&'a str>,
}

#[derive(Serialize)]
struct Completion<'a> {
    confessed_at: DateTime<Utc>,
    notes_after: Option<&'a str>,
}

/// Confession records in the hosted `confessions` table.
#[derive(Clone)]
pub struct RemoteConfessionRepository {
    client: RemoteClient,
}

impl RemoteConfessionRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    fn by_id(id: Uuid) -> RowQuery {
        RowQuery::new().select(COLUMNS).eq("id", id)
    }

    fn single(rows: Vec<ConfessionRecord>, id: Uuid) -> Result<ConfessionRecord> {
        rows.into_iter()
            .next()
            .ok_or_else(|| FiatError::not_found(ENTITY, id.to_string()))
    }
}

#[async_trait]
impl ConfessionRepository for RemoteConfessionRepository {
    async fn list(&self, limit: usize) -> Result<Vec<ConfessionRecord>> {
        let query = RowQuery::new()
            .select(COLUMNS)
            .order("created_at", false)
            .limit(limit);
        self.client.select(TABLE, &query, Access::User).await
    }

    async fn create(&self, draft: &ConfessionDraft) -> Result<ConfessionRecord> {
        let session = self.client.require_session()?;
        let body = ConfessionInsert {
            user_id: session.user_id(),
            planned_date: draft.planned_date,
            notes_before: draft.notes_before.as_deref(),
        };
        let query = RowQuery::new().select(COLUMNS);
        let rows: Vec<ConfessionRecord> =
            self.client.insert(TABLE, &[body], &query, Access::User).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| FiatError::internal("insert into confessions returned no row"))
    }

    async fn get(&self, id: Uuid) -> Result<ConfessionRecord> {
        let rows = self
            .client
            .select(TABLE, &Self::by_id(id).limit(1), Access::User)
            .await?;
        Self::single(rows, id)
    }

    async fn update(&self, id: Uuid, patch: &ConfessionPatch) -> Result<ConfessionRecord> {
        let rows = self.client.update(TABLE, patch, &Self::by_id(id)).await?;
        Self::single(rows, id)
    }

    async fn mark_confessed(
        &self,
        id: Uuid,
        notes_after: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<ConfessionRecord> {
        let completion = Completion {
            confessed_at: at,
            notes_after,
        };
        let rows = self.client.update(TABLE, &completion, &Self::by_id(id)).await?;
        Self::single(rows, id)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let rows: Vec<ConfessionRecord> = self.client.delete(TABLE, &Self::by_id(id)).await?;
        if rows.is_empty() {
            return Err(FiatError::not_found(ENTITY, id.to_string()));
        }
        Ok(())
    }
}
