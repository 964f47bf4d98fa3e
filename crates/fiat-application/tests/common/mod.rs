//! Fakes for end-to-end tests: a hosted backend that can be taken offline.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fiat_application::{MoodSync, SessionProvider, SyncedStore};
use fiat_core::mood::MoodEntry;
use fiat_core::session::{AuthProvider, AuthUser, Credentials, Session, SessionContext};
use fiat_core::sync::{OrderedBatch, RecentWindow, SyncBackend};
use fiat_core::truth::{NewTruthPost, TruthPost, TruthRepository};
use fiat_core::{FiatError, Result};
use fiat_infrastructure::{LocalDatabase, SqliteMoodStore};

pub fn day(s: &str) -> NaiveDate {
    fiat_core::date::parse_date_input(s).unwrap()
}

/// Remote mood table scoped per user, reachable until `go_offline`.
pub struct FlakyRemote {
    session: SessionContext,
    online: AtomicBool,
    rows: Mutex<BTreeMap<(String, NaiveDate), MoodEntry>>,
}

impl FlakyRemote {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            online: AtomicBool::new(true),
            rows: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn user(&self) -> Result<String> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(FiatError::remote_unavailable("connection refused"));
        }
        Ok(self.session.require_session()?.user.id)
    }
}

#[async_trait]
impl SyncBackend<MoodEntry> for FlakyRemote {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn upsert(&self, item: &MoodEntry) -> Result<MoodEntry> {
        let user = self.user()?;
        let mut stored = item.clone();
        stored.updated_at = Utc::now();
        self.rows
            .lock()
            .unwrap()
            .insert((user, item.date), stored.clone());
        Ok(stored)
    }

    async fn fetch(&self, key: &NaiveDate) -> Result<Option<MoodEntry>> {
        let user = self.user()?;
        Ok(self.rows.lock().unwrap().get(&(user, *key)).cloned())
    }

    async fn recent(&self, window: &RecentWindow) -> Result<OrderedBatch<MoodEntry>> {
        let user = self.user()?;
        let rows = self.rows.lock().unwrap();
        let items = rows
            .iter()
            .filter(|((owner, date), _)| {
                owner == &user && window.since.is_none_or(|since| *date >= since)
            })
            .map(|(_, entry)| entry.clone())
            .take(window.limit)
            .collect();
        Ok(OrderedBatch::ascending(items))
    }
}

/// Accepts any password and remembers nothing across processes.
#[derive(Default)]
pub struct OpenAuth {
    stored: Mutex<Option<Session>>,
}

#[async_trait]
impl AuthProvider for OpenAuth {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let session = Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: None,
            user: AuthUser {
                id: credentials.email.clone(),
                email: Some(credentials.email.clone()),
                username: None,
            },
        };
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials, _: Option<&str>) -> Result<Option<Session>> {
        self.sign_in_with_password(credentials).await.map(Some)
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }

    async fn refresh_session(&self, session: &Session) -> Result<Session> {
        Ok(session.clone())
    }
}

#[derive(Default)]
pub struct BoardTable {
    pub rows: Mutex<Vec<TruthPost>>,
}

#[async_trait]
impl TruthRepository for BoardTable {
    async fn list(&self, limit: usize) -> Result<Vec<TruthPost>> {
        Ok(self.rows.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    async fn insert(&self, post: &NewTruthPost) -> Result<TruthPost> {
        let mut rows = self.rows.lock().unwrap();
        let stored = TruthPost {
            id: rows.len() as i64 + 1,
            text: post.text.clone(),
            author: Some(post.author.clone()),
            created_at: Utc::now(),
            user_id: Some(post.user_id.clone()),
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

/// A signed-in app: provider, flaky remote and an in-memory SQLite cache.
pub struct Harness {
    pub provider: SessionProvider,
    pub remote: Arc<FlakyRemote>,
    pub local: Arc<SqliteMoodStore>,
    pub moods: MoodSync,
}

impl Harness {
    pub async fn signed_in(email: &str) -> Self {
        let provider = SessionProvider::new(Arc::new(OpenAuth::default()));
        provider.initialize().await;
        provider
            .sign_in(&Credentials::new(email, "pw").unwrap())
            .await
            .unwrap();

        let remote = Arc::new(FlakyRemote::new(provider.context()));
        let local = Arc::new(SqliteMoodStore::new(Arc::new(LocalDatabase::in_memory())));
        let moods = MoodSync::new(SyncedStore::new(remote.clone(), local.clone()));
        Self {
            provider,
            remote,
            local,
            moods,
        }
    }
}
