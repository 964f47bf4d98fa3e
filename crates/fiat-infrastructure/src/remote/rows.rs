//! Wire shapes of remote rows.

use chrono::{DateTime, NaiveDate, Utc};
use fiat_core::journal::{EntryId, JournalEntry};
use fiat_core::mood::{MoodEntry, MoodScore};
use fiat_core::{FiatError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct MoodRow {
    pub date: NaiveDate,
    pub score: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MoodRow {
    /// Converts a row. Timestamps the table does not carry are taken from `fallback`.
    pub fn into_entry(self, fallback: DateTime<Utc>) -> Result<MoodEntry> {
        let score = MoodScore::new(self.score).map_err(|e| FiatError::Serialization {
            format: "JSON".to_string(),
            message: format!("remote mood {}: {e}", self.date),
        })?;
        let created_at = self.created_at.unwrap_or(fallback);
        Ok(MoodEntry {
            date: self.date,
            score,
            note: self.note,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MoodUpsert<'a> {
    pub user_id: &'a str,
    pub date: NaiveDate,
    pub score: i64,
    pub note: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JournalRow {
    /// UUID text or bigint depending on the table definition.
    pub id: Value,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JournalRow> for JournalEntry {
    fn from(row: JournalRow) -> Self {
        let id = match row.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        JournalEntry {
            id: EntryId::new(id),
            title: row.title,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JournalInsert<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub body: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JournalChanges<'a> {
    pub title: &'a str,
    pub body: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mood_row_with_offset_timestamps() {
        let row: MoodRow = serde_json::from_value(json!({
            "id": 7,
            "user_id": "u1",
            "date": "2025-08-14",
            "score": 4,
            "note": null,
            "created_at": "2025-08-14T09:30:00.123456+00:00"
        }))
        .unwrap();
        let entry = row.into_entry(Utc::now()).unwrap();
        assert_eq!(entry.score.value(), 4);
        assert_eq!(entry.updated_at, entry.created_at);
    }

    #[test]
    fn test_out_of_range_remote_score_is_rejected() {
        let row: MoodRow =
            serde_json::from_value(json!({"date": "2025-08-14", "score": 9})).unwrap();
        assert!(row.into_entry(Utc::now()).is_err());
    }

    #[test]
    fn test_journal_row_numeric_id() {
        let row: JournalRow = serde_json::from_value(json!({
            "id": 42,
            "title": "t",
            "created_at": "2025-08-14T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(JournalEntry::from(row).id.as_str(), "42");
    }
}
