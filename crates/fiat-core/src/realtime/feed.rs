//! Subscription contract.

use std::fmt;
use std::sync::Arc;

use super::event::ChangeEvent;

/// Callback invoked for every event on a subscribed table.
///
/// Handlers run on the publisher's task and must not block.
pub type ChangeHandler = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// A source of row change events.
pub trait ChangeFeed: Send + Sync {
    /// Registers `handler` for events on `table`.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped or explicitly released.
    fn subscribe(&self, table: &str, handler: ChangeHandler) -> Subscription;
}

/// A registered listener. Releasing happens exactly once: on
/// [`unsubscribe`](Self::unsubscribe) or on drop, whichever comes first.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    table: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(table: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            table: table.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!("Releasing change subscription on '{}'", self.table);
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("table", &self.table)
            .field("active", &self.release.is_some())
            .finish()
    }
}
