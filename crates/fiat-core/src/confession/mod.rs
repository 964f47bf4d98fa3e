//! Confession domain module.
//!
//! A confession record is planned (date and/or notes), edited any number of
//! times, and optionally marked as confessed. Once `confessed_at` is set no
//! operation clears it.
//!
//! # Module Structure
//!
//! - `model`: `ConfessionRecord`, drafts/patches, `ConfessionStatus`
//! - `repository`: `ConfessionRepository` trait for persistence

mod model;
pub mod repository;

pub use model::{
    ConfessionDraft, ConfessionPatch, ConfessionRecord, ConfessionStatus, parse_confession_id,
};
pub use repository::ConfessionRepository;
