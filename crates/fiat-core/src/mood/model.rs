//! Mood domain model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FiatError, Result};
use crate::sync::Syncable;

/// A mood score on the 1 (low) to 5 (great) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MoodScore(u8);

impl MoodScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(FiatError::validation(
                "score",
                format!("must be between {} and {}, got {value}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = FiatError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MoodScore> for i64 {
    fn from(score: MoodScore) -> Self {
        score.0 as i64
    }
}

impl fmt::Display for MoodScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One day's mood check-in.
///
/// At most one entry exists per (user, date); the date is the upsert key in
/// both the local cache and the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub score: MoodScore,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Builds a fresh check-in stamped with `now`. An empty note is stored as no note;
    /// any other note is kept byte for byte.
    pub fn new(date: NaiveDate, score: MoodScore, note: Option<&str>, now: DateTime<Utc>) -> Self {
        let note = note.filter(|n| !n.is_empty()).map(str::to_string);
        Self {
            date,
            score,
            note,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Syncable for MoodEntry {
    type Key = NaiveDate;
    type Order = NaiveDate;

    const ENTITY: &'static str = "Mood";

    fn key(&self) -> NaiveDate {
        self.date
    }

    fn order_key(&self) -> NaiveDate {
        self.date
    }
}
