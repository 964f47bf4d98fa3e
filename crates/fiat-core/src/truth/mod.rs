//! Truth board domain module.
//!
//! A shared, append-only board of short quotes. Every user can read every
//! post; the owner is recorded for attribution only.

mod model;
pub mod repository;

pub use model::{ANONYMOUS, NewTruthPost, TruthPost, resolve_display_name};
pub use repository::TruthRepository;

/// Table name on the hosted backend, also the change-feed topic.
pub const TRUTH_TABLE: &str = "truth_board";
