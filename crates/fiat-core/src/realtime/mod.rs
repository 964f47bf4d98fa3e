//! Row change notifications.
//!
//! A [`ChangeFeed`] delivers insert/update/delete events for a table to
//! registered handlers. Registration returns a [`Subscription`] that releases
//! the handler when dropped, so a listener cannot outlive its owner.
//!
//! # Module Structure
//!
//! - `event`: `ChangeEvent`, `ChangeKind`
//! - `feed`: `ChangeFeed`, `Subscription`, `ChangeHandler`
//! - `hub`: `ChangeHub` (in-process fan-out)

mod event;
mod feed;
mod hub;

pub use event::{ChangeEvent, ChangeKind};
pub use feed::{ChangeFeed, ChangeHandler, Subscription};
pub use hub::ChangeHub;
