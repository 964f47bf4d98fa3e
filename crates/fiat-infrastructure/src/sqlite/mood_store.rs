use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fiat_core::date::{format_date, parse_date_input};
use fiat_core::mood::{MoodEntry, MoodScore};
use fiat_core::sync::{OrderedBatch, RecentWindow, SyncBackend};
use fiat_core::{FiatError, Result};
use rusqlite::{OptionalExtension, Row, params};

use super::{LocalDatabase, format_timestamp, parse_timestamp};

const MOOD_COLUMNS: &str = "date, score, note, created_at, updated_at";

/// Local cache of mood check-ins, keyed by date.
#[derive(Debug, Clone)]
pub struct SqliteMoodStore {
    db: Arc<LocalDatabase>,
}

impl SqliteMoodStore {
    pub fn new(db: Arc<LocalDatabase>) -> Self {
        Self { db }
    }
}

/// Raw column values; converted outside the rusqlite row closure so domain
/// errors keep their own type.
struct MoodRow {
    date: String,
    score: i64,
    note: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl MoodRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            score: row.get(1)?,
            note: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_entry(self) -> Result<MoodEntry> {
        let date = parse_date_input(&self.date)
            .ok_or_else(|| FiatError::local_store(format!("bad mood date '{}'", self.date)))?;
        let score = MoodScore::new(self.score)
            .map_err(|e| FiatError::local_store(format!("mood {}: {e}", self.date)))?;

        // Rows written before timestamps were tracked fall back to the day itself.
        let midnight = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let created_at = match self.created_at.as_deref() {
            Some(ts) => parse_timestamp("created_at", ts)?,
            None => midnight.unwrap_or_default(),
        };
        let updated_at = match self.updated_at.as_deref() {
            Some(ts) => parse_timestamp("updated_at", ts)?,
            None => created_at,
        };

        Ok(MoodEntry {
            date,
            score,
            note: self.note,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl SyncBackend<MoodEntry> for SqliteMoodStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn upsert(&self, item: &MoodEntry) -> Result<MoodEntry> {
        let date = format_date(item.date);
        let score = i64::from(item.score);
        let note = item.note.clone();
        let created_at = format_timestamp(item.created_at);
        let updated_at = format_timestamp(item.updated_at);

        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    &format!(
                        "INSERT INTO moods (date, score, note, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT(date) DO UPDATE SET
                             score = excluded.score,
                             note = excluded.note,
                             created_at = COALESCE(moods.created_at, excluded.created_at),
                             updated_at = excluded.updated_at
                         RETURNING {MOOD_COLUMNS}"
                    ),
                    params![date, score, note, created_at, updated_at],
                    MoodRow::read,
                )
            })
            .await?;
        tracing::debug!("Stored mood for {} locally", row.date);
        row.into_entry()
    }

    async fn fetch(&self, key: &NaiveDate) -> Result<Option<MoodEntry>> {
        let date = format_date(*key);
        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    &format!("SELECT {MOOD_COLUMNS} FROM moods WHERE date = ?1"),
                    params![date],
                    MoodRow::read,
                )
                .optional()
            })
            .await?;
        row.map(MoodRow::into_entry).transpose()
    }

    async fn recent(&self, window: &RecentWindow) -> Result<OrderedBatch<MoodEntry>> {
        let since = window.since.map(format_date);
        let limit = i64::try_from(window.limit).unwrap_or(i64::MAX);

        let rows = self
            .db
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {MOOD_COLUMNS} FROM moods
                     WHERE (?1 IS NULL OR date >= ?1)
                     ORDER BY date DESC
                     LIMIT ?2"
                ))?;
                let rows = stmt.query_map(params![since, limit], MoodRow::read)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;

        let entries = rows
            .into_iter()
            .map(MoodRow::into_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(OrderedBatch::descending(entries))
    }
}
