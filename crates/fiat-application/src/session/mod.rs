//! Session application services.
//!
//! This module owns the process-wide auth state and its lifecycle: the
//! initial session check, auth events, and teardown.

mod provider;

pub use provider::SessionProvider;
