//! Authentication session domain.
//!
//! The session is process-wide state with a defined lifecycle: it starts as
//! `Loading`, resolves to `Authenticated` or `Unauthenticated`, and is replaced
//! wholesale on every auth event. Components never reach for it globally; they
//! receive a [`SessionContext`] and read from it.
//!
//! # Module Structure
//!
//! - `model`: `Session`, `AuthUser`, `Credentials`
//! - `state`: `AuthState`, `AuthEvent`, `NavigationGate`
//! - `context`: `SessionContext` (read-only view over the live state)
//! - `provider`: `AuthProvider` trait implemented by the backend adapter

mod context;
mod model;
pub mod provider;
mod state;

pub use context::SessionContext;
pub use model::{AuthUser, Credentials, Session};
pub use provider::AuthProvider;
pub use state::{AuthEvent, AuthState, NavigationGate};
