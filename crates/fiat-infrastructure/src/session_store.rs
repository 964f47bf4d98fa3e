//! Persisted auth session.
//!
//! Holds the backend credentials across restarts. The file is written
//! atomically with owner-only permissions and removed on sign-out.

use fiat_core::Result;
use fiat_core::session::Session;
use serde::{Deserialize, Serialize};

use crate::paths::FiatPaths;
use crate::storage::AtomicTomlFile;

#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    session: Session,
}

pub struct SessionFileStore {
    file: AtomicTomlFile<SessionDocument>,
}

impl SessionFileStore {
    pub fn new(paths: &FiatPaths) -> Self {
        Self {
            file: AtomicTomlFile::private(paths.session_file()),
        }
    }

    pub fn load(&self) -> Result<Option<Session>> {
        Ok(self.file.load()?.map(|doc| doc.session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        self.file.save(&SessionDocument {
            session: session.clone(),
        })?;
        tracing::debug!("Persisted session for user {}", session.user_id());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.file.remove()?;
        Ok(())
    }
}
