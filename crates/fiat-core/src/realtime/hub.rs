//! In-process fan-out of change events.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::event::ChangeEvent;
use super::feed::{ChangeFeed, ChangeHandler, Subscription};

type Listeners = HashMap<u64, (String, ChangeHandler)>;

/// Routes published events to the handlers subscribed to their table.
///
/// Cloning shares the listener set. A websocket adapter publishes into the
/// hub; facades subscribe to it.
#[derive(Clone, Default)]
pub struct ChangeHub {
    listeners: Arc<Mutex<Listeners>>,
    next_id: Arc<AtomicU64>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every handler on its table. Returns how many ran.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        // Handlers run outside the lock so they may (un)subscribe.
        let handlers: Vec<ChangeHandler> = self.with_listeners(|l| {
            l.values()
                .filter(|(table, _)| *table == event.table)
                .map(|(_, handler)| handler.clone())
                .collect()
        });

        tracing::debug!(
            "Publishing {} on '{}' to {} listener(s)",
            event.kind,
            event.table,
            handlers.len()
        );
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Number of live subscriptions on `table`.
    pub fn listener_count(&self, table: &str) -> usize {
        self.with_listeners(|l| l.values().filter(|(t, _)| t == table).count())
    }

    /// Tables with at least one live subscription.
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> =
            self.with_listeners(|l| l.values().map(|(t, _)| t.clone()).collect());
        tables.sort();
        tables.dedup();
        tables
    }

    fn with_listeners<R>(&self, f: impl FnOnce(&mut Listeners) -> R) -> R {
        match self.listeners.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl ChangeFeed for ChangeHub {
    fn subscribe(&self, table: &str, handler: ChangeHandler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.with_listeners(|l| l.insert(id, (table.to_string(), handler)));
        tracing::debug!("Subscribed listener {} to '{}'", id, table);

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(table, move || {
            if let Some(listeners) = listeners.upgrade() {
                let mut guard = match listeners.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.remove(&id);
            }
        })
    }
}
