use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fiat_core::date::format_date;
use fiat_core::mood::MoodEntry;
use fiat_core::sync::{OrderedBatch, RecentWindow, SyncBackend};
use fiat_core::{FiatError, Result};

use super::client::{Access, RemoteClient};
use super::query::RowQuery;
use super::rows::{MoodRow, MoodUpsert};

const TABLE: &str = "moods";
const COLUMNS: &str = "date,score,note,created_at,updated_at";

/// The signed-in user's moods on the hosted backend, one row per (user, date).
#[derive(Clone)]
pub struct RemoteMoodStore {
    client: RemoteClient,
}

impl RemoteMoodStore {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SyncBackend<MoodEntry> for RemoteMoodStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn upsert(&self, item: &MoodEntry) -> Result<MoodEntry> {
        let session = self.client.require_session()?;
        let body = MoodUpsert {
            user_id: session.user_id(),
            date: item.date,
            score: i64::from(item.score),
            note: item.note.as_deref(),
            updated_at: item.updated_at,
        };
        let query = RowQuery::new().select(COLUMNS).on_conflict("user_id,date");
        let rows: Vec<MoodRow> = self.client.insert(TABLE, &[body], &query, Access::User).await?;

        let row = rows.into_iter().next().ok_or_else(|| {
            FiatError::internal(format!("upsert of mood {} returned no row", item.date))
        })?;
        row.into_entry(item.created_at)
    }

    async fn fetch(&self, key: &NaiveDate) -> Result<Option<MoodEntry>> {
        let session = self.client.require_session()?;
        let query = RowQuery::new()
            .select(COLUMNS)
            .eq("user_id", session.user_id())
            .eq("date", format_date(*key))
            .limit(1);
        let rows: Vec<MoodRow> = self.client.select(TABLE, &query, Access::User).await?;
        rows.into_iter()
            .next()
            .map(|row| row.into_entry(Utc::now()))
            .transpose()
    }

    async fn recent(&self, window: &RecentWindow) -> Result<OrderedBatch<MoodEntry>> {
        let session = self.client.require_session()?;
        let query = RowQuery::new()
            .select(COLUMNS)
            .eq("user_id", session.user_id());
        // A bounded window is read oldest-first; an open one newest-first so
        // the limit keeps the latest rows.
        let (query, ascending) = match window.since {
            Some(since) => (query.gte("date", format_date(since)), true),
            None => (query, false),
        };
        let query = query.order("date", ascending).limit(window.limit);

        let rows: Vec<MoodRow> = self.client.select(TABLE, &query, Access::User).await?;
        let now = Utc::now();
        let entries = rows
            .into_iter()
            .map(|row| row.into_entry(now))
            .collect::<Result<Vec<_>>>()?;
        Ok(if ascending {
            OrderedBatch::ascending(entries)
        } else {
            OrderedBatch::descending(entries)
        })
    }
}
