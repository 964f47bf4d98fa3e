//! The shared truth board.
//!
//! Everyone can read the board; posting needs a signed-in user. Live updates
//! come from a [`ChangeFeed`] on the board's table: every change triggers a
//! fresh listing which is handed to the watcher.

use std::sync::Arc;

use fiat_core::realtime::{ChangeEvent, ChangeFeed, Subscription};
use fiat_core::session::SessionContext;
use fiat_core::truth::{NewTruthPost, TRUTH_TABLE, TruthPost, TruthRepository};
use fiat_core::{FiatError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Clone)]
pub struct TruthBoard {
    repository: Arc<dyn TruthRepository>,
    session: SessionContext,
    feed: Option<Arc<dyn ChangeFeed>>,
    list_limit: usize,
}

impl TruthBoard {
    pub fn new(
        repository: Arc<dyn TruthRepository>,
        session: SessionContext,
        list_limit: usize,
    ) -> Self {
        Self {
            repository,
            session,
            feed: None,
            list_limit,
        }
    }

    /// Enables [`watch`](Self::watch) through `feed`.
    pub fn with_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Newest posts first, up to `limit`.
    pub async fn list(&self, limit: usize) -> Result<Vec<TruthPost>> {
        self.repository.list(limit).await
    }

    pub async fn list_latest(&self) -> Result<Vec<TruthPost>> {
        self.list(self.list_limit).await
    }

    /// Posts `text` as the signed-in user.
    ///
    /// Identity is checked first, then the text. The author is the first
    /// non-empty of `display_name`, the profile username, the profile email.
    pub async fn post(&self, text: &str, display_name: Option<&str>) -> Result<TruthPost> {
        let user = self.session.require_user()?;
        let post = NewTruthPost::new(text, display_name, &user)?;
        let stored = self.repository.insert(&post).await?;
        info!("Posted truth {} as '{}'", stored.id, post.author);
        Ok(stored)
    }

    /// Calls `on_update` with a fresh listing after every change on the board.
    ///
    /// Bursts of events are coalesced into one re-fetch. Must be called from
    /// within a tokio runtime; watching stops when the returned handle is dropped.
    pub fn watch<F>(&self, on_update: F) -> Result<TruthWatch>
    where
        F: Fn(Result<Vec<TruthPost>>) + Send + Sync + 'static,
    {
        let feed = self
            .feed
            .as_ref()
            .ok_or_else(|| FiatError::config("live updates need a realtime feed"))?;

        let (tx, mut rx) = mpsc::unbounded_channel::<ChangeEvent>();
        let subscription = feed.subscribe(
            TRUTH_TABLE,
            Arc::new(move |event: ChangeEvent| {
                let _ = tx.send(event);
            }),
        );

        let repository = self.repository.clone();
        let limit = self.list_limit;
        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let mut coalesced = 0usize;
                while rx.try_recv().is_ok() {
                    coalesced += 1;
                }
                debug!(
                    "Truth board {} event (+{} more), re-fetching",
                    event.kind, coalesced
                );
                on_update(repository.list(limit).await);
            }
        });

        Ok(TruthWatch {
            subscription: Some(subscription),
            task,
        })
    }
}

/// A running watch on the truth board. Dropping it unsubscribes and stops
/// the re-fetch task.
#[must_use = "dropping a TruthWatch stops watching immediately"]
pub struct TruthWatch {
    subscription: Option<Subscription>,
    task: JoinHandle<()>,
}

impl TruthWatch {
    pub fn stop(self) {}
}

impl Drop for TruthWatch {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use fiat_core::realtime::{ChangeHub, ChangeKind};
    use fiat_core::session::AuthState;
    use serde_json::json;

    use super::*;
    use crate::test_support::{MemoryTruths, session};

    fn board(repo: Arc<MemoryTruths>, state: AuthState) -> TruthBoard {
        TruthBoard::new(repo, SessionContext::fixed(state), 50)
    }

    #[tokio::test]
    async fn test_signed_out_post_is_rejected() {
        let repo = Arc::new(MemoryTruths::default());
        let truths = board(repo.clone(), AuthState::Unauthenticated);

        let err = truths.post("hello", Some("")).await.unwrap_err();
        assert!(err.is_not_signed_in());
        // identity is checked before the text
        assert!(truths.post("", None).await.unwrap_err().is_not_signed_in());
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loading_counts_as_signed_out() {
        let repo = Arc::new(MemoryTruths::default());
        let truths = board(repo, AuthState::Loading);
        assert!(truths.post("hello", None).await.unwrap_err().is_not_signed_in());
    }

    #[tokio::test]
    async fn test_post_resolves_author_and_trims() {
        let repo = Arc::new(MemoryTruths::default());
        let truths = board(repo, AuthState::Authenticated(session("maria")));

        let post = truths.post("  I forgave him.  ", Some(" ")).await.unwrap();
        assert_eq!(post.text, "I forgave him.");
        assert_eq!(post.author.as_deref(), Some("maria@example.com"));
        assert_eq!(post.user_id.as_deref(), Some("maria"));

        let named = truths.post("again", Some("M.")).await.unwrap();
        assert_eq!(named.author.as_deref(), Some("M."));

        assert!(truths.post("   ", None).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_limited() {
        let repo = Arc::new(MemoryTruths::default());
        let truths = board(repo, AuthState::Authenticated(session("u1")));
        for text in ["one", "two", "three"] {
            truths.post(text, None).await.unwrap();
        }

        let texts: Vec<_> = truths
            .list(2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn test_watch_without_feed_fails() {
        let truths = board(Arc::new(MemoryTruths::default()), AuthState::Unauthenticated);
        assert!(truths.watch(|_| {}).is_err());
    }

    #[tokio::test]
    async fn test_watch_refetches_and_releases() {
        let repo = Arc::new(MemoryTruths::default());
        let hub = ChangeHub::new();
        let truths = board(repo.clone(), AuthState::Authenticated(session("u1")))
            .with_feed(Arc::new(hub.clone()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watch = truths
            .watch(move |listing| {
                let _ = tx.send(listing.map(|posts| posts.len()));
            })
            .unwrap();
        assert_eq!(hub.listener_count(TRUTH_TABLE), 1);
        assert_eq!(hub.tables(), vec![TRUTH_TABLE.to_string()]);

        truths.post("hello", None).await.unwrap();
        hub.publish(ChangeEvent::new(
            TRUTH_TABLE,
            ChangeKind::Insert,
            json!({"id": 1, "text": "hello"}),
        ));

        let seen = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seen.unwrap(), 1);

        drop(watch);
        assert_eq!(hub.listener_count(TRUTH_TABLE), 0);
        assert!(hub.tables().is_empty());
        assert_eq!(hub.publish(ChangeEvent::new(TRUTH_TABLE, ChangeKind::Delete, json!({}))), 0);
    }
}
