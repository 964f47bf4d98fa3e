use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fiat_core::Result;
use fiat_core::error::FiatError;
use fiat_core::journal::{EntryId, JournalDraft, JournalEntry, JournalRepository};
use rusqlite::{OptionalExtension, Row, params};

use super::{LocalDatabase, format_timestamp, parse_timestamp};

const ENTITY: &str = "Journal entry";

/// Journal entries in the on-device `entries` table.
#[derive(Debug, Clone)]
pub struct SqliteJournalRepository {
    db: Arc<LocalDatabase>,
}

impl SqliteJournalRepository {
    pub fn new(db: Arc<LocalDatabase>) -> Self {
        Self { db }
    }
}

type EntryRow = (i64, String, Option<String>, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_entry((id, title, body, created_at): EntryRow) -> Result<JournalEntry> {
    Ok(JournalEntry {
        id: EntryId::from(id),
        title,
        body,
        created_at: parse_timestamp("created_at", &created_at)?,
    })
}

/// Local ids are row ids; anything else cannot exist here.
fn row_id(id: &EntryId) -> Result<i64> {
    id.as_str()
        .parse()
        .map_err(|_| FiatError::not_found(ENTITY, id.as_str()))
}

#[async_trait]
impl JournalRepository for SqliteJournalRepository {
    async fn list(&self, limit: usize) -> Result<Vec<JournalEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .db
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, body, created_at FROM entries
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], read_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        rows.into_iter().map(into_entry).collect()
    }

    async fn create(&self, draft: &JournalDraft) -> Result<JournalEntry> {
        let title = draft.title.clone();
        let body = draft.body.clone();
        let created_at = format_timestamp(Utc::now());
        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    "INSERT INTO entries (created_at, title, body) VALUES (?1, ?2, ?3)
                     RETURNING id, title, body, created_at",
                    params![created_at, title, body],
                    read_row,
                )
            })
            .await?;
        tracing::debug!("Created local journal entry {}", row.0);
        into_entry(row)
    }

    async fn get(&self, id: &EntryId) -> Result<JournalEntry> {
        let rid = row_id(id)?;
        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    "SELECT id, title, body, created_at FROM entries WHERE id = ?1",
                    params![rid],
                    read_row,
                )
                .optional()
            })
            .await?;
        row.map(into_entry)
            .transpose()?
            .ok_or_else(|| FiatError::not_found(ENTITY, id.as_str()))
    }

    async fn update(&self, id: &EntryId, draft: &JournalDraft) -> Result<JournalEntry> {
        let rid = row_id(id)?;
        let title = draft.title.clone();
        let body = draft.body.clone();
        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    "UPDATE entries SET title = ?2, body = ?3 WHERE id = ?1
                     RETURNING id, title, body, created_at",
                    params![rid, title, body],
                    read_row,
                )
                .optional()
            })
            .await?;
        row.map(into_entry)
            .transpose()?
            .ok_or_else(|| FiatError::not_found(ENTITY, id.as_str()))
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let rid = row_id(id)?;
        let removed = self
            .db
            .with_conn(move |conn| conn.execute("DELETE FROM entries WHERE id = ?1", params![rid]))
            .await?;
        if removed == 0 {
            return Err(FiatError::not_found(ENTITY, id.as_str()));
        }
        tracing::debug!("Deleted local journal entry {}", rid);
        Ok(())
    }
}
