//! In-memory fakes shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fiat_core::confession::{
    ConfessionDraft, ConfessionPatch, ConfessionRecord, ConfessionRepository,
};
use fiat_core::journal::{EntryId, JournalDraft, JournalEntry, JournalRepository};
use fiat_core::mood::{MoodEntry, MoodScore};
use fiat_core::session::{AuthProvider, AuthUser, Credentials, Session};
use fiat_core::sync::{OrderedBatch, RecentWindow, SortOrder, SyncBackend};
use fiat_core::truth::{NewTruthPost, TruthPost, TruthRepository};
use fiat_core::{FiatError, Result};
use uuid::Uuid;

pub fn at(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, d, 9, 0, 0).unwrap()
}

pub fn mood(date: NaiveDate, score: i64, note: Option<&str>) -> MoodEntry {
    MoodEntry::new(date, MoodScore::new(score).unwrap(), note, Utc::now())
}

pub fn session(user_id: &str) -> Session {
    Session {
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at: None,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(format!("{user_id}@example.com")),
            username: None,
        },
    }
}

/// Mood store in memory that reports the given native order.
pub struct MemoryBackend {
    name: &'static str,
    order: SortOrder,
    rows: Mutex<BTreeMap<NaiveDate, MoodEntry>>,
}

impl MemoryBackend {
    pub fn ascending(name: &'static str) -> Self {
        Self::new(name, SortOrder::Ascending)
    }

    pub fn descending(name: &'static str) -> Self {
        Self::new(name, SortOrder::Descending)
    }

    fn new(name: &'static str, order: SortOrder) -> Self {
        Self {
            name,
            order,
            rows: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn insert(&self, entry: MoodEntry) {
        self.rows.lock().unwrap().insert(entry.date, entry);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SyncBackend<MoodEntry> for MemoryBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn upsert(&self, item: &MoodEntry) -> Result<MoodEntry> {
        self.insert(item.clone());
        Ok(item.clone())
    }

    async fn fetch(&self, key: &NaiveDate) -> Result<Option<MoodEntry>> {
        Ok(self.rows.lock().unwrap().get(key).cloned())
    }

    async fn recent(&self, window: &RecentWindow) -> Result<OrderedBatch<MoodEntry>> {
        let rows = self.rows.lock().unwrap();
        let in_window = rows
            .values()
            .filter(|m| window.since.is_none_or(|since| m.date >= since))
            .cloned();
        let items: Vec<_> = match self.order {
            SortOrder::Ascending => in_window.take(window.limit).collect(),
            SortOrder::Descending => in_window.rev().take(window.limit).collect(),
        };
        Ok(OrderedBatch::new(items, self.order))
    }
}

/// A store whose every call fails with the same error.
pub struct FailingBackend {
    error: FiatError,
    pub calls: AtomicUsize,
}

impl FailingBackend {
    pub fn offline() -> Self {
        Self::with(FiatError::remote_unavailable("connection refused"))
    }

    pub fn signed_out() -> Self {
        Self::with(FiatError::NotSignedIn)
    }

    pub fn broken_disk() -> Self {
        Self::with(FiatError::local_store("disk I/O error"))
    }

    fn with(error: FiatError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

#[async_trait]
impl SyncBackend<MoodEntry> for FailingBackend {
    fn name(&self) -> &'static str {
        if matches!(self.error, FiatError::LocalStore(_)) {
            "local"
        } else {
            "remote"
        }
    }

    async fn upsert(&self, _item: &MoodEntry) -> Result<MoodEntry> {
        self.fail()
    }

    async fn fetch(&self, _key: &NaiveDate) -> Result<Option<MoodEntry>> {
        self.fail()
    }

    async fn recent(&self, _window: &RecentWindow) -> Result<OrderedBatch<MoodEntry>> {
        self.fail()
    }
}

#[derive(Default)]
pub struct MemoryJournal {
    rows: Mutex<Vec<JournalEntry>>,
    next_id: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MemoryJournal {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl JournalRepository for MemoryJournal {
    async fn list(&self, limit: usize) -> Result<Vec<JournalEntry>> {
        self.touch();
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().take(limit).cloned().collect())
    }

    async fn create(&self, draft: &JournalDraft) -> Result<JournalEntry> {
        self.touch();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let entry = JournalEntry {
            id: EntryId::from(id as i64),
            title: draft.title.clone(),
            body: draft.body.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: &EntryId) -> Result<JournalEntry> {
        self.touch();
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| FiatError::not_found("Journal entry", id.as_str()))
    }

    async fn update(&self, id: &EntryId, draft: &JournalDraft) -> Result<JournalEntry> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        let entry = rows
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| FiatError::not_found("Journal entry", id.as_str()))?;
        entry.title = draft.title.clone();
        entry.body = draft.body.clone();
        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        self.touch();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| &e.id != id);
        if rows.len() == before {
            return Err(FiatError::not_found("Journal entry", id.as_str()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryConfessions {
    rows: Mutex<Vec<ConfessionRecord>>,
    pub calls: AtomicUsize,
}

impl MemoryConfessions {
    fn with_row<R>(&self, id: Uuid, f: impl FnOnce(&mut ConfessionRecord) -> R) -> Result<R> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        rows.iter_mut()
            .find(|r| r.id == id)
            .map(f)
            .ok_or_else(|| FiatError::not_found("Confession", id.to_string()))
    }
}

#[async_trait]
impl ConfessionRepository for MemoryConfessions {
    async fn list(&self, limit: usize) -> Result<Vec<ConfessionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    async fn create(&self, draft: &ConfessionDraft) -> Result<ConfessionRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let record = ConfessionRecord {
            id: Uuid::new_v4(),
            planned_date: draft.planned_date,
            notes_before: draft.notes_before.clone(),
            confessed_at: None,
            notes_after: None,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<ConfessionRecord> {
        self.with_row(id, |r| r.clone())
    }

    async fn update(&self, id: Uuid, patch: &ConfessionPatch) -> Result<ConfessionRecord> {
        self.with_row(id, |r| {
            r.planned_date = patch.planned_date;
            r.notes_before = patch.notes_before.clone();
            r.notes_after = patch.notes_after.clone();
            r.clone()
        })
    }

    async fn mark_confessed(
        &self,
        id: Uuid,
        notes_after: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<ConfessionRecord> {
        self.with_row(id, |r| {
            r.confessed_at = Some(at);
            r.notes_after = notes_after.map(str::to_string);
            r.clone()
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(FiatError::not_found("Confession", id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTruths {
    rows: Mutex<Vec<TruthPost>>,
    pub inserts: AtomicUsize,
    pub lists: AtomicUsize,
}

#[async_trait]
impl TruthRepository for MemoryTruths {
    async fn list(&self, limit: usize) -> Result<Vec<TruthPost>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    async fn insert(&self, post: &NewTruthPost) -> Result<TruthPost> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
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

/// Auth backend with a scripted persisted session.
#[derive(Default)]
pub struct FakeAuth {
    pub stored: Mutex<Option<Session>>,
    pub refresh_fails: bool,
    pub confirm_email: bool,
    pub sign_outs: AtomicUsize,
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        if credentials.password != "correct" {
            return Err(FiatError::RemoteRejected {
                status: 400,
                message: "Invalid login credentials".into(),
            });
        }
        let user = credentials.email.split('@').next().unwrap_or("user");
        let s = session(user);
        *self.stored.lock().unwrap() = Some(s.clone());
        Ok(s)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        username: Option<&str>,
    ) -> Result<Option<Session>> {
        if self.confirm_email {
            return Ok(None);
        }
        let mut s = session(credentials.email.split('@').next().unwrap_or("user"));
        s.user.username = username.map(str::to_string);
        *self.stored.lock().unwrap() = Some(s.clone());
        Ok(Some(s))
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = None;
        Ok(())
    }

    async fn refresh_session(&self, session: &Session) -> Result<Session> {
        if self.refresh_fails {
            return Err(FiatError::RemoteRejected {
                status: 400,
                message: "Invalid Refresh Token".into(),
            });
        }
        let mut refreshed = session.clone();
        refreshed.access_token = format!("{}-refreshed", session.access_token);
        refreshed.expires_at = Some(Utc::now() + chrono::Duration::hours(1));
        *self.stored.lock().unwrap() = Some(refreshed.clone());
        Ok(refreshed)
    }
}
