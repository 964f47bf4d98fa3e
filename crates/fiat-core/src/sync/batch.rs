//! Listings tagged with their sort order.

use super::backend::Syncable;

/// Direction a store returned its rows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

/// Rows as a store returned them, together with the order they are in.
///
/// Consumers such as trend charts need oldest-to-newest data. Reversing an
/// already ascending listing silently inverts the series, so the order travels
/// with the rows and [`OrderedBatch::into_ascending`] is the only way out.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedBatch<T> {
    items: Vec<T>,
    order: SortOrder,
}

impl<T> OrderedBatch<T> {
    pub fn new(items: Vec<T>, order: SortOrder) -> Self {
        Self { items, order }
    }

    pub fn ascending(items: Vec<T>) -> Self {
        Self::new(items, SortOrder::Ascending)
    }

    pub fn descending(items: Vec<T>) -> Self {
        Self::new(items, SortOrder::Descending)
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Syncable> OrderedBatch<T> {
    /// Returns the rows oldest-first.
    pub fn into_ascending(self) -> Vec<T> {
        let mut items = self.items;
        if self.order == SortOrder::Descending {
            items.reverse();
        }
        debug_assert!(
            items
                .windows(2)
                .all(|pair| pair[0].order_key() <= pair[1].order_key()),
            "{} batch was not in its declared order",
            T::ENTITY
        );
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point(u32);

    impl Syncable for Point {
        type Key = u32;
        type Order = u32;
        const ENTITY: &'static str = "point";

        fn key(&self) -> u32 {
            self.0
        }

        fn order_key(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_descending_is_reversed() {
        let batch = OrderedBatch::descending(vec![Point(3), Point(2), Point(1)]);
        assert_eq!(batch.into_ascending(), vec![Point(1), Point(2), Point(3)]);
    }

    #[test]
    fn test_ascending_is_untouched() {
        let batch = OrderedBatch::ascending(vec![Point(1), Point(2), Point(3)]);
        assert_eq!(batch.into_ascending(), vec![Point(1), Point(2), Point(3)]);
    }

    #[test]
    fn test_empty_batch() {
        let batch: OrderedBatch<Point> = OrderedBatch::descending(Vec::new());
        assert!(batch.is_empty());
        assert!(batch.into_ascending().is_empty());
    }
}
