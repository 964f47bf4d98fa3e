//! Journal domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FiatError, Result};

/// Opaque journal entry identifier.
///
/// The remote store hands out UUIDs, the on-device table integer row ids;
/// both travel as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Title and body for a new entry or a full replacement of an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl JournalDraft {
    /// Validates user input: the title is trimmed and must not be empty.
    /// An empty body is stored as no body.
    pub fn new(title: &str, body: Option<&str>) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FiatError::validation("title", "must not be empty"));
        }
        Ok(Self {
            title: title.to_string(),
            body: body.filter(|b| !b.is_empty()).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_rejects_blank_title() {
        assert!(JournalDraft::new("", None).unwrap_err().is_validation());
        assert!(JournalDraft::new(" \t\n", Some("body")).unwrap_err().is_validation());
    }

    #[test]
    fn test_draft_trims_title() {
        let draft = JournalDraft::new("  Morning prayer ", Some("")).unwrap();
        assert_eq!(draft.title, "Morning prayer");
        assert_eq!(draft.body, None);
    }

    #[test]
    fn test_entry_id_from_row_id() {
        assert_eq!(EntryId::from(17).as_str(), "17");
    }
}
