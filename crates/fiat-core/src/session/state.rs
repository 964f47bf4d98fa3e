//! Auth state machine values.

use super::model::Session;

/// Process-wide authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The initial session check has not resolved yet.
    #[default]
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn gate(&self) -> NavigationGate {
        match self {
            Self::Loading => NavigationGate::Pending,
            Self::Authenticated(_) => NavigationGate::SignedIn,
            Self::Unauthenticated => NavigationGate::SignedOut,
        }
    }
}

impl From<Option<Session>> for AuthState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => Self::Authenticated(session),
            None => Self::Unauthenticated,
        }
    }
}

/// Which screens a navigation layer may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationGate {
    /// Render nothing yet.
    Pending,
    SignedIn,
    SignedOut,
}

/// A notification from the auth backend. Each event carries the session
/// that replaces the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession(Option<Session>),
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
    UserUpdated(Session),
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialSession(_) => "INITIAL_SESSION",
            Self::SignedIn(_) => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed(_) => "TOKEN_REFRESHED",
            Self::UserUpdated(_) => "USER_UPDATED",
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::InitialSession(session) => session.as_ref(),
            Self::SignedIn(session) | Self::TokenRefreshed(session) | Self::UserUpdated(session) => {
                Some(session)
            }
            Self::SignedOut => None,
        }
    }

    /// The state this event moves the provider into.
    pub fn into_state(self) -> AuthState {
        match self {
            Self::InitialSession(session) => session.into(),
            Self::SignedIn(session) | Self::TokenRefreshed(session) | Self::UserUpdated(session) => {
                AuthState::Authenticated(session)
            }
            Self::SignedOut => AuthState::Unauthenticated,
        }
    }
}
