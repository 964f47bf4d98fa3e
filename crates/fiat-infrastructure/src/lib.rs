pub mod config;
pub mod paths;
pub mod remote;
pub mod session_store;
pub mod sqlite;
pub mod storage;

pub use crate::config::{ConfigService, FiatConfig};
pub use crate::paths::FiatPaths;
pub use crate::remote::{
    AuthClient, RealtimeFeed, RemoteClient, RemoteConfessionRepository,
    RemoteJournalRepository, RemoteMoodStore, RemoteTruthRepository,
};
pub use crate::session_store::SessionFileStore;
pub use crate::sqlite::{LocalDatabase, SqliteJournalRepository, SqliteMoodStore};
