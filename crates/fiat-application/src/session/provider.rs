use std::sync::Arc;

use chrono::Utc;
use fiat_core::session::{
    AuthEvent, AuthProvider, AuthState, Credentials, Session, SessionContext,
};
use fiat_core::{FiatError, Result};
use tokio::sync::watch;
use tracing::{info, warn};

/// Owner of the live [`AuthState`].
///
/// The provider is the only writer. Every other component reads the state
/// through a [`SessionContext`] obtained from [`context`](Self::context).
///
/// # Lifecycle
///
/// 1. Created in `Loading`
/// 2. [`initialize`](Self::initialize) resolves the persisted session
/// 3. Auth events ([`apply`](Self::apply), sign-in/out, refresh) replace the state wholesale
/// 4. [`shutdown`](Self::shutdown) signs the process out and closes the channel
pub struct SessionProvider {
    auth: Arc<dyn AuthProvider>,
    tx: watch::Sender<AuthState>,
}

impl SessionProvider {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (tx, _rx) = watch::channel(AuthState::Loading);
        Self { auth, tx }
    }

    /// A read-only handle on the state, for facades and screens.
    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.tx.subscribe())
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Resolves the persisted session and leaves `Loading`.
    ///
    /// An expired session is refreshed once. Any failure on the way ends in
    /// `Unauthenticated` rather than an error.
    pub async fn initialize(&self) -> AuthState {
        let session = match self.auth.current_session().await {
            Ok(Some(session)) if session.is_expired(Utc::now()) => {
                match self.auth.refresh_session(&session).await {
                    Ok(refreshed) => Some(refreshed),
                    Err(e) => {
                        warn!("Stored session expired and could not be refreshed: {}", e);
                        None
                    }
                }
            }
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to load stored session: {}", e);
                None
            }
        };
        self.apply(AuthEvent::InitialSession(session))
    }

    /// Replaces the state with the one `event` leads to and returns it.
    pub fn apply(&self, event: AuthEvent) -> AuthState {
        info!(
            "Auth event {} (user: {})",
            event.name(),
            event.session().map(Session::user_id).unwrap_or("-")
        );
        let state = event.into_state();
        self.tx.send_replace(state.clone());
        state
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.auth.sign_in_with_password(credentials).await?;
        self.apply(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Registers an account. When the backend waits for email confirmation
    /// no session is issued and the state stays as it was.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Email and password of the new account
    /// * `username` - Optional profile name shown on the truth board
    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        username: Option<&str>,
    ) -> Result<Option<Session>> {
        let session = self.auth.sign_up(credentials, username).await?;
        match &session {
            Some(session) => {
                self.apply(AuthEvent::SignedIn(session.clone()));
            }
            None => info!("Sign-up for {} awaits email confirmation", credentials.email),
        }
        Ok(session)
    }

    /// Signs out. The state becomes `Unauthenticated` even when the backend
    /// call fails; that failure is still returned.
    pub async fn sign_out(&self) -> Result<()> {
        let result = match self.state().session() {
            Some(session) => self.auth.sign_out(session).await,
            None => Ok(()),
        };
        self.apply(AuthEvent::SignedOut);
        result
    }

    /// Exchanges the refresh token for a new session.
    pub async fn refresh(&self) -> Result<Session> {
        let current = self.state().session().cloned().ok_or(FiatError::NotSignedIn)?;
        let session = self.auth.refresh_session(&current).await?;
        self.apply(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    /// Tears the provider down. Contexts see a final `Unauthenticated` state,
    /// after which [`SessionContext::changed`] yields `None`.
    pub fn shutdown(self) {
        self.tx.send_replace(AuthState::Unauthenticated);
        info!("Session provider shut down");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::Duration;
    use fiat_core::session::NavigationGate;

    use super::*;
    use crate::test_support::{FakeAuth, session};

    fn expired(user: &str) -> Session {
        let mut s = session(user);
        s.expires_at = Some(Utc::now() - Duration::minutes(5));
        s
    }

    #[tokio::test]
    async fn test_starts_loading_and_gates_pending() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::default()));
        let context = provider.context();
        assert!(context.state().is_loading());
        assert_eq!(context.gate(), NavigationGate::Pending);
        assert!(context.require_user().unwrap_err().is_not_signed_in());
    }

    #[tokio::test]
    async fn test_initialize_without_stored_session() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::default()));
        let context = provider.context();
        assert_eq!(provider.initialize().await, AuthState::Unauthenticated);
        assert_eq!(context.gate(), NavigationGate::SignedOut);
    }

    #[tokio::test]
    async fn test_initialize_restores_stored_session() {
        let auth = FakeAuth::default();
        *auth.stored.lock().unwrap() = Some(session("u1"));
        let provider = SessionProvider::new(Arc::new(auth));

        let state = provider.initialize().await;
        assert_eq!(state.session().map(Session::user_id), Some("u1"));
        assert_eq!(provider.context().gate(), NavigationGate::SignedIn);
    }

    #[tokio::test]
    async fn test_initialize_refreshes_expired_session() {
        let auth = FakeAuth::default();
        *auth.stored.lock().unwrap() = Some(expired("u1"));
        let provider = SessionProvider::new(Arc::new(auth));

        let state = provider.initialize().await;
        let session = state.session().unwrap();
        assert!(session.access_token.ends_with("-refreshed"));
        assert!(!session.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_initialize_failed_refresh_is_signed_out() {
        let auth = FakeAuth {
            refresh_fails: true,
            ..FakeAuth::default()
        };
        *auth.stored.lock().unwrap() = Some(expired("u1"));
        let provider = SessionProvider::new(Arc::new(auth));

        assert_eq!(provider.initialize().await, AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_in_and_out_update_contexts() {
        let auth = Arc::new(FakeAuth::default());
        let provider = SessionProvider::new(auth.clone());
        let mut context = provider.context();
        provider.initialize().await;

        let credentials = Credentials::new("ana@example.com", "correct").unwrap();
        provider.sign_in(&credentials).await.unwrap();
        assert_eq!(context.require_user().unwrap().id, "ana");

        provider.sign_out().await.unwrap();
        assert_eq!(context.changed().await, Some(AuthState::Unauthenticated));
        assert_eq!(auth.sign_outs.load(Ordering::SeqCst), 1);
        assert!(auth.stored.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_state() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::default()));
        provider.initialize().await;

        let credentials = Credentials::new("ana@example.com", "wrong").unwrap();
        assert!(provider.sign_in(&credentials).await.is_err());
        assert_eq!(provider.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_up_awaiting_confirmation() {
        let auth = FakeAuth {
            confirm_email: true,
            ..FakeAuth::default()
        };
        let provider = SessionProvider::new(Arc::new(auth));
        provider.initialize().await;

        let credentials = Credentials::new("new@example.com", "secret").unwrap();
        assert_eq!(provider.sign_up(&credentials, Some("newbie")).await.unwrap(), None);
        assert_eq!(provider.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::default()));
        provider.initialize().await;
        assert!(provider.refresh().await.unwrap_err().is_not_signed_in());
    }

    #[tokio::test]
    async fn test_resolved_waits_for_initialize() {
        let auth = FakeAuth::default();
        *auth.stored.lock().unwrap() = Some(session("u1"));
        let provider = Arc::new(SessionProvider::new(Arc::new(auth)));
        let mut context = provider.context();

        let init = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.initialize().await })
        };
        let state = context.resolved().await;
        assert_eq!(state.session().map(Session::user_id), Some("u1"));
        init.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_contexts() {
        let provider = SessionProvider::new(Arc::new(FakeAuth::default()));
        let mut context = provider.context();
        provider.apply(AuthEvent::SignedIn(session("u1")));
        context.changed().await;

        provider.shutdown();
        assert_eq!(context.changed().await, Some(AuthState::Unauthenticated));
        assert_eq!(context.changed().await, None);
    }
}
