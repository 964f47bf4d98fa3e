//! Application layer for fiat.
//!
//! Use cases that coordinate domain contracts with whatever stores the
//! composition root plugs in: the mood sync facade over a [`SyncedStore`],
//! journal/confession services, the truth board and the session provider.

pub mod confession_service;
pub mod journal_service;
pub mod mood_sync;
pub mod session;
pub mod sync;
pub mod truth_board;

#[cfg(test)]
mod test_support;

pub use confession_service::ConfessionService;
pub use journal_service::JournalService;
pub use mood_sync::MoodSync;
pub use session::SessionProvider;
pub use sync::{SyncOutcome, SyncWarning, SyncedStore, UnavailableBackend};
pub use truth_board::{TruthBoard, TruthWatch};
