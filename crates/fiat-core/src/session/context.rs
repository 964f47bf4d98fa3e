//! Read-only view over the live auth state.

use tokio::sync::watch;

use super::model::{AuthUser, Session};
use super::state::{AuthState, NavigationGate};
use crate::error::{FiatError, Result};

/// A cheap, cloneable handle to the current auth state.
///
/// Consumers read the state, never mutate it. The provider that owns the
/// sending side replaces the state wholesale on each auth event.
#[derive(Debug, Clone)]
pub struct SessionContext {
    rx: watch::Receiver<AuthState>,
}

impl SessionContext {
    pub fn new(rx: watch::Receiver<AuthState>) -> Self {
        Self { rx }
    }

    /// A context frozen at `state`, with no provider behind it.
    pub fn fixed(state: AuthState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self { rx }
    }

    pub fn state(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    pub fn gate(&self) -> NavigationGate {
        self.rx.borrow().gate()
    }

    pub fn session(&self) -> Option<Session> {
        self.rx.borrow().session().cloned()
    }

    /// The active session, or `NotSignedIn`. A state still loading counts as signed out.
    pub fn require_session(&self) -> Result<Session> {
        self.session().ok_or(FiatError::NotSignedIn)
    }

    pub fn require_user(&self) -> Result<AuthUser> {
        self.require_session().map(|s| s.user)
    }

    /// Waits for the next state change. Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until the state is no longer `Loading`.
    pub async fn resolved(&mut self) -> AuthState {
        let resolved = self
            .rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone())
            .ok();
        resolved.unwrap_or_else(|| self.state())
    }
}
