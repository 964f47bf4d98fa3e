//! Error types for the Fiat application.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Fiat application.
///
/// Every variant renders as a sentence that can be shown to the user as-is.
/// Variants map onto four behavioural classes:
///
/// - identity (`NotSignedIn`) and input (`Validation`) errors fail fast before any I/O
/// - remote failures (`RemoteUnavailable`, `RemoteRejected`) may be recovered by a
///   local fallback on read paths that have one
/// - `NotFound` is always surfaced, never turned into an empty result
/// - everything else is a local/internal failure
#[derive(Error, Debug, Clone, Serialize)]
pub enum FiatError {
    /// An operation that needs a user identity ran without an active session.
    #[error("You must be signed in to do that")]
    NotSignedIn,

    /// Malformed or missing user input, caught before any store is touched.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Network or backend failure (connection refused, timeout, 5xx).
    #[error("Server unavailable: {0}")]
    RemoteUnavailable(String),

    /// The backend answered but refused the request (4xx other than auth/not-found).
    #[error("Request rejected by server ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// Referenced row does not exist or is not owned by the caller.
    #[error("{entity_type} '{id}' was not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// On-device store failure.
    #[error("Local storage error: {0}")]
    LocalStore(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FiatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error for the named input field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates a RemoteUnavailable error
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Creates a LocalStore error
    pub fn local_store(message: impl Into<String>) -> Self {
        Self::LocalStore(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a NotSignedIn error
    pub fn is_not_signed_in(&self) -> bool {
        matches!(self, Self::NotSignedIn)
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error came from the remote side of the wire.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable(_) | Self::RemoteRejected { .. }
        )
    }

    /// Whether a read that failed with this error may be served from the local cache.
    ///
    /// Identity and transport failures qualify; input errors never do since the
    /// same input would be just as wrong for the local store.
    pub fn is_fallback_eligible(&self) -> bool {
        !self.is_validation()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FiatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for FiatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FiatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for FiatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the CLI boundary)
impl From<anyhow::Error> for FiatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, FiatError>`.
pub type Result<T> = std::result::Result<T, FiatError>;
