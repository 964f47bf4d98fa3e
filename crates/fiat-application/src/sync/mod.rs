//! Entity-agnostic dual-store coordination.

mod synced_store;
mod unavailable;

pub use synced_store::{SyncOutcome, SyncWarning, SyncedStore};
pub use unavailable::UnavailableBackend;
