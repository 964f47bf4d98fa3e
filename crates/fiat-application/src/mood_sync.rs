//! Mood check-ins kept in both the hosted backend and the on-device store.

use chrono::{NaiveDate, Utc};
use fiat_core::Result;
use fiat_core::mood::{MoodEntry, MoodScore};
use fiat_core::sync::RecentWindow;
use tracing::debug;

use crate::sync::{SyncOutcome, SyncedStore};

/// Facade over a [`SyncedStore`] of mood entries.
///
/// The remote store is authoritative whenever it answers; the local store
/// always takes the write and answers reads the remote cannot.
#[derive(Clone)]
pub struct MoodSync {
    store: SyncedStore<MoodEntry>,
}

impl MoodSync {
    pub fn new(store: SyncedStore<MoodEntry>) -> Self {
        Self { store }
    }

    /// Saves the mood for `date`, replacing any earlier entry for that day.
    ///
    /// The score is checked before either store is touched. A failed remote
    /// write is reported in [`SyncOutcome::warnings`], not as an error.
    pub async fn save_today_mood(
        &self,
        date: NaiveDate,
        score: i64,
        note: Option<&str>,
    ) -> Result<SyncOutcome<MoodEntry>> {
        let score = MoodScore::new(score)?;
        let entry = MoodEntry::new(date, score, note, Utc::now());
        let outcome = self.store.write(&entry).await?;
        debug!(
            "Mood for {} saved (score {}, source {})",
            date, outcome.record.score, outcome.source
        );
        Ok(outcome)
    }

    pub async fn get_today_mood(&self, date: NaiveDate) -> Result<Option<MoodEntry>> {
        self.store.fetch(&date).await
    }

    /// Moods of the last `max_count` days ending today, oldest first.
    pub async fn list_recent_moods(&self, max_count: usize) -> Result<Vec<MoodEntry>> {
        self.list_recent_moods_until(Utc::now().date_naive(), max_count)
            .await
    }

    pub async fn list_recent_moods_until(
        &self,
        today: NaiveDate,
        max_count: usize,
    ) -> Result<Vec<MoodEntry>> {
        self.store
            .recent(&RecentWindow::last_days(today, max_count))
            .await
    }
}
