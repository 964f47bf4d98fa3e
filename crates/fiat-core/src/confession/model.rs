//! Confession domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::optional_date;
use crate::error::{FiatError, Result};

/// Where a confession record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfessionStatus {
    /// Not yet completed.
    Planned,
    /// `confessed_at` has been recorded.
    Confessed,
}

/// A stored confession record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfessionRecord {
    pub id: Uuid,
    #[serde(default)]
    pub planned_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes_before: Option<String>,
    /// Absent until the confession is completed.
    #[serde(default)]
    pub confessed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes_after: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ConfessionRecord {
    pub fn status(&self) -> ConfessionStatus {
        if self.confessed_at.is_some() {
            ConfessionStatus::Confessed
        } else {
            ConfessionStatus::Planned
        }
    }
}

/// Fields of a new confession record. All-empty drafts are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfessionDraft {
    pub planned_date: Option<NaiveDate>,
    pub notes_before: Option<String>,
}

impl ConfessionDraft {
    /// Builds a draft from raw user input. The date must be `YYYY-MM-DD` when present.
    pub fn from_input(planned_date: Option<&str>, notes_before: Option<&str>) -> Result<Self> {
        Ok(Self {
            planned_date: optional_date("planned_date", planned_date)?,
            notes_before: non_empty(notes_before),
        })
    }
}

/// Editable fields of an existing record. Every field is replaced,
/// so `None` clears it. `confessed_at` is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfessionPatch {
    pub planned_date: Option<NaiveDate>,
    pub notes_before: Option<String>,
    pub notes_after: Option<String>,
}

impl ConfessionPatch {
    /// Builds a patch from raw user input. The date must be `YYYY-MM-DD` when present.
    pub fn from_input(
        planned_date: Option<&str>,
        notes_before: Option<&str>,
        notes_after: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            planned_date: optional_date("planned_date", planned_date)?,
            notes_before: non_empty(notes_before),
            notes_after: non_empty(notes_after),
        })
    }
}

/// Parses a record id typed by the user.
pub fn parse_confession_id(input: &str) -> Result<Uuid> {
    Uuid::parse_str(input.trim())
        .map_err(|_| FiatError::validation("id", format!("'{}' is not a confession id", input.trim())))
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty()).map(str::to_string)
}
