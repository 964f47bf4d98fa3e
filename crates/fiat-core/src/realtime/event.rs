//! Change event model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FiatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

impl FromStr for ChangeKind {
    type Err = FiatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(FiatError::internal(format!("unknown change kind '{other}'"))),
        }
    }
}

/// One row-level change on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    /// New row image; `Null` for deletes.
    #[serde(default)]
    pub record: Value,
    /// Previous row image when the backend sends one.
    #[serde(default)]
    pub old_record: Option<Value>,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind, record: Value) -> Self {
        Self {
            table: table.into(),
            kind,
            record,
            old_record: None,
        }
    }
}
