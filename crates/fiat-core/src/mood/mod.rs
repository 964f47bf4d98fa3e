//! Mood domain module.
//!
//! A mood check-in is one score (1 to 5) and an optional note per calendar
//! day. A later check-in for the same day replaces the earlier one.
//!
//! # Module Structure
//!
//! - `model`: `MoodEntry`, `MoodScore`

mod model;

pub use model::{MoodEntry, MoodScore};
