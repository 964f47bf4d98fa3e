//! Backend trait for stores participating in a synced pair.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::batch::OrderedBatch;
use crate::error::Result;

/// An entity that can be kept in a primary and a secondary store.
pub trait Syncable: Clone + Send + Sync + 'static {
    /// Uniqueness key shared by both stores (upsert target).
    type Key: Clone + Debug + Send + Sync + 'static;
    /// Value listings are ordered by.
    type Order: Ord;

    /// Human-readable entity name used in logs and errors.
    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;

    fn order_key(&self) -> Self::Order;
}

/// Bounds for a "most recent" listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    /// Inclusive lower bound on the entity's calendar day, if any.
    pub since: Option<NaiveDate>,
    /// Maximum number of rows.
    pub limit: usize,
}

impl RecentWindow {
    pub fn new(limit: usize) -> Self {
        Self { since: None, limit }
    }

    /// The last `days` days ending at `today`, at most `days` rows.
    ///
    /// A span reaching past the calendar's range leaves the window unbounded.
    pub fn last_days(today: NaiveDate, days: usize) -> Self {
        let since = i64::try_from(days.saturating_sub(1))
            .ok()
            .and_then(chrono::Duration::try_days)
            .and_then(|span| today.checked_sub_signed(span));
        Self {
            since,
            limit: days,
        }
    }
}

/// A store that can hold a [`Syncable`] entity.
///
/// Implementations decide their own native ordering for listings and must
/// report it truthfully through [`OrderedBatch`].
#[async_trait]
pub trait SyncBackend<T: Syncable>: Send + Sync {
    /// Short label used in logs and warnings ("remote", "local").
    fn name(&self) -> &'static str;

    /// Inserts or replaces the row with the same key and returns the stored row.
    async fn upsert(&self, item: &T) -> Result<T>;

    /// Finds the row with the given key.
    ///
    /// `Ok(None)` means the store answered and has no such row.
    async fn fetch(&self, key: &T::Key) -> Result<Option<T>>;

    /// Lists recent rows within the window.
    async fn recent(&self, window: &RecentWindow) -> Result<OrderedBatch<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_days_window() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        let window = RecentWindow::last_days(today, 7);
        assert_eq!(window.since, NaiveDate::from_ymd_opt(2025, 8, 8));
        assert_eq!(window.limit, 7);
    }

    #[test]
    fn test_huge_window_is_unbounded() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        for days in [usize::MAX, 1_000_000_000_000, 400_000_000] {
            let window = RecentWindow::last_days(today, days);
            assert_eq!(window.since, None, "days = {days}");
            assert_eq!(window.limit, days);
        }
    }

    #[test]
    fn test_zero_day_window_is_today() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 14).unwrap();
        let window = RecentWindow::last_days(today, 0);
        assert_eq!(window.since, Some(today));
        assert_eq!(window.limit, 0);
    }
}
