//! Dual-store synchronization contracts.
//!
//! This module holds the entity-agnostic pieces of the local-first sync layer:
//! the [`Syncable`] bound for entities that live in two stores, the
//! [`SyncBackend`] trait each store implements, and [`OrderedBatch`], which
//! makes the sort order of a listing explicit so callers can normalise it.
//!
//! # Module Structure
//!
//! - `backend`: `Syncable`, `SyncBackend`, `RecentWindow`
//! - `batch`: `OrderedBatch`, `SortOrder`

mod backend;
mod batch;

pub use backend::{RecentWindow, SyncBackend, Syncable};
pub use batch::{OrderedBatch, SortOrder};
