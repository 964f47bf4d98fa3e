use std::marker::PhantomData;

use async_trait::async_trait;
use fiat_core::sync::{OrderedBatch, RecentWindow, SyncBackend, Syncable};
use fiat_core::{FiatError, Result};

/// Stands in for a store that cannot be built, e.g. a backend with no URL.
///
/// Every call fails with the same error, so a [`SyncedStore`](super::SyncedStore)
/// using it as primary keeps working on its secondary and reports the cause
/// as a warning.
pub struct UnavailableBackend<T> {
    name: &'static str,
    error: FiatError,
    _entity: PhantomData<fn() -> T>,
}

impl<T> UnavailableBackend<T> {
    pub fn new(name: &'static str, error: FiatError) -> Self {
        Self {
            name,
            error,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Syncable> SyncBackend<T> for UnavailableBackend<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn upsert(&self, _item: &T) -> Result<T> {
        Err(self.error.clone())
    }

    async fn fetch(&self, _key: &T::Key) -> Result<Option<T>> {
        Err(self.error.clone())
    }

    async fn recent(&self, _window: &RecentWindow) -> Result<OrderedBatch<T>> {
        Err(self.error.clone())
    }
}
