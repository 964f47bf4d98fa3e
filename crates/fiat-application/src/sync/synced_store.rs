use std::fmt;
use std::sync::Arc;

use fiat_core::sync::{RecentWindow, SyncBackend, Syncable};
use fiat_core::{FiatError, Result};
use tracing::{debug, warn};

/// A non-fatal failure of the best-effort half of a write.
#[derive(Debug, Clone)]
pub struct SyncWarning {
    /// Backend that failed ("remote", "local").
    pub backend: &'static str,
    pub error: FiatError,
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "saved on this device only ({} store: {})", self.backend, self.error)
    }
}

/// Result of a synced write.
#[derive(Debug, Clone)]
pub struct SyncOutcome<T> {
    /// The record that is now the saved state.
    pub record: T,
    /// Backend whose copy `record` is.
    pub source: &'static str,
    pub warnings: Vec<SyncWarning>,
}

impl<T> SyncOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// One entity kept in two stores.
///
/// The *primary* (the hosted backend) is authoritative whenever it answers.
/// The *secondary* (the on-device cache) must always accept writes and
/// serves reads when the primary fails.
///
/// Writes go to both stores concurrently. There is no cross-store
/// transaction: a primary failure after a secondary success leaves the two
/// diverged until the next successful primary write.
pub struct SyncedStore<T: Syncable> {
    primary: Arc<dyn SyncBackend<T>>,
    secondary: Arc<dyn SyncBackend<T>>,
}

impl<T: Syncable> Clone for SyncedStore<T> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

impl<T: Syncable> SyncedStore<T> {
    pub fn new(primary: Arc<dyn SyncBackend<T>>, secondary: Arc<dyn SyncBackend<T>>) -> Self {
        Self { primary, secondary }
    }

    /// Upserts into both stores.
    ///
    /// Fails only if the secondary write fails. A primary failure becomes a
    /// [`SyncWarning`]. The returned record is the primary's row when it
    /// succeeded, else the secondary's.
    pub async fn write(&self, item: &T) -> Result<SyncOutcome<T>> {
        let (primary, secondary) =
            tokio::join!(self.primary.upsert(item), self.secondary.upsert(item));

        let cached = secondary.map_err(|e| {
            warn!(
                "{} write to {} store failed: {}",
                T::ENTITY,
                self.secondary.name(),
                e
            );
            e
        })?;

        match primary {
            Ok(saved) => {
                debug!("{} {:?} saved to both stores", T::ENTITY, item.key());
                Ok(SyncOutcome {
                    record: saved,
                    source: self.primary.name(),
                    warnings: Vec::new(),
                })
            }
            Err(error) => {
                warn!(
                    "{} {:?} kept in {} store only, {} write failed: {}",
                    T::ENTITY,
                    item.key(),
                    self.secondary.name(),
                    self.primary.name(),
                    error
                );
                Ok(SyncOutcome {
                    record: cached,
                    source: self.secondary.name(),
                    warnings: vec![SyncWarning {
                        backend: self.primary.name(),
                        error,
                    }],
                })
            }
        }
    }

    /// Looks up `key`. A primary answer, including "no row", is final.
    pub async fn fetch(&self, key: &T::Key) -> Result<Option<T>> {
        match self.primary.fetch(key).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_fallback_eligible() => {
                warn!(
                    "{} {:?}: {} read failed ({}), using {} store",
                    T::ENTITY,
                    key,
                    self.primary.name(),
                    e,
                    self.secondary.name()
                );
                self.secondary.fetch(key).await
            }
            Err(e) => Err(e),
        }
    }

    /// Recent rows, always oldest-first regardless of which store answered.
    pub async fn recent(&self, window: &RecentWindow) -> Result<Vec<T>> {
        let batch = match self.primary.recent(window).await {
            Ok(batch) => batch,
            Err(e) if e.is_fallback_eligible() => {
                warn!(
                    "{} listing: {} read failed ({}), using {} store",
                    T::ENTITY,
                    self.primary.name(),
                    e,
                    self.secondary.name()
                );
                self.secondary.recent(window).await?
            }
            Err(e) => return Err(e),
        };
        let mut items = batch.into_ascending();
        // Keep the newest rows if a store ignored the limit.
        if items.len() > window.limit {
            items.drain(..items.len() - window.limit);
        }
        Ok(items)
    }
}
