//! Auth backend contract.

use async_trait::async_trait;

use super::model::{Credentials, Session};
use crate::error::Result;

/// Authentication operations offered by the hosted backend.
///
/// Implementations own credential persistence: a session returned from
/// `sign_in_with_password`, `sign_up` or `refresh_session` is remembered and
/// handed back by `current_session` after a restart, and `sign_out` forgets it.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The persisted session, if any. May be expired.
    async fn current_session(&self) -> Result<Option<Session>>;

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session>;

    /// Registers a new account. Returns `None` when the backend requires
    /// email confirmation before issuing a session.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        username: Option<&str>,
    ) -> Result<Option<Session>>;

    async fn sign_out(&self, session: &Session) -> Result<()>;

    async fn refresh_session(&self, session: &Session) -> Result<Session>;
}
