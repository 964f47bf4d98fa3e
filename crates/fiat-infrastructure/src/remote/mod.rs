//! Adapter for the hosted backend.
//!
//! # Module Structure
//!
//! - `client`: `RemoteClient`, authenticated row requests and error mapping
//! - `query`: `RowQuery` filter builder
//! - `rows`: wire shapes that differ from the domain models
//! - `mood`, `journal`, `confession`, `truth`: per-table stores
//! - `auth`: `AuthClient` (`AuthProvider` over the auth endpoints)
//! - `realtime`: `RealtimeFeed` websocket change feed

mod auth;
mod client;
mod confession;
mod journal;
mod mood;
pub mod query;
mod realtime;
mod rows;
mod truth;

pub use auth::AuthClient;
pub use client::{Access, RemoteClient};
pub use confession::RemoteConfessionRepository;
pub use journal::RemoteJournalRepository;
pub use mood::RemoteMoodStore;
pub use realtime::RealtimeFeed;
pub use truth::RemoteTruthRepository;
