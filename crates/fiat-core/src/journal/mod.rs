//! Journal domain module.
//!
//! Free-form reflections created by explicit user action, editable until
//! deleted. Deletion is permanent.
//!
//! # Module Structure
//!
//! - `model`: `JournalEntry`, `EntryId`, `JournalDraft`
//! - `repository`: `JournalRepository` trait for persistence

mod model;
pub mod repository;

pub use model::{EntryId, JournalDraft, JournalEntry};
pub use repository::JournalRepository;
