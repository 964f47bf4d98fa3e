//! Truth board models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FiatError, Result};
use crate::session::AuthUser;

/// Fallback attribution when neither input nor profile yields a name.
pub const ANONYMOUS: &str = "Anonymous";

/// A post on the shared board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthPost {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A post about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTruthPost {
    pub text: String,
    pub author: String,
    pub user_id: String,
}

impl NewTruthPost {
    /// Validates the text (trimmed, non-empty) and resolves the author for `user`.
    pub fn new(text: &str, display_name: Option<&str>, user: &AuthUser) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FiatError::validation("text", "must not be empty"));
        }
        Ok(Self {
            text: text.to_string(),
            author: resolve_display_name(display_name, user),
            user_id: user.id.clone(),
        })
    }
}

/// First non-empty of: explicit input, profile username, profile email, "Anonymous".
pub fn resolve_display_name(explicit: Option<&str>, user: &AuthUser) -> String {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| user.profile_name())
        .unwrap_or(ANONYMOUS)
        .to_string()
}
