use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fiat_core::{FiatError, Result};
use rusqlite::Connection;
use tokio::sync::OnceCell;

use super::store_error;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS moods (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date    TEXT NOT NULL UNIQUE,
    score   INTEGER NOT NULL,
    note    TEXT
);

CREATE TABLE IF NOT EXISTS entries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    title       TEXT NOT NULL,
    body        TEXT
);

CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries(created_at);
"#;

/// Columns added to `moods` after the first release. Databases created
/// before that lack them, so they are added on open when missing.
const MOOD_TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// The process-wide local store.
///
/// The connection is opened on first use and reused by every caller.
/// SQLite serializes writes itself; the mutex only guards the handle.
pub struct LocalDatabase {
    location: Location,
    conn: OnceCell<Mutex<Connection>>,
}

impl std::fmt::Debug for LocalDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDatabase")
            .field("location", &self.location)
            .field("open", &self.conn.initialized())
            .finish()
    }
}

impl LocalDatabase {
    /// A store at `path`. Nothing touches the disk until the first query.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Runs `f` against the shared connection, opening it if needed.
    pub async fn with_conn<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<R>,
    {
        let conn = self.conn.get_or_try_init(|| self.open()).await?;
        let guard = conn
            .lock()
            .map_err(|e| FiatError::local_store(format!("connection lock poisoned: {e}")))?;
        f(&guard).map_err(store_error)
    }

    async fn open(&self) -> Result<Mutex<Connection>> {
        let conn = match &self.location {
            Location::File(path) => open_file(path)?,
            Location::Memory => Connection::open_in_memory().map_err(store_error)?,
        };
        migrate(&conn).map_err(store_error)?;
        tracing::info!("Opened local store ({:?})", self.location);
        Ok(Mutex::new(conn))
    }
}

fn open_file(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path).map_err(store_error)?;
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(store_error)?;
    tracing::debug!("SQLite journal mode: {}", mode);
    Ok(conn)
}

/// Idempotent: safe to run on every start.
fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    let existing: Vec<String> = {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('moods')")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect::<rusqlite::Result<_>>()?
    };
    for column in MOOD_TIMESTAMP_COLUMNS {
        if !existing.iter().any(|c| c == column) {
            tracing::info!("Adding moods.{} column", column);
            conn.execute_batch(&format!("ALTER TABLE moods ADD COLUMN {column} TEXT;"))?;
        }
    }
    Ok(())
}
