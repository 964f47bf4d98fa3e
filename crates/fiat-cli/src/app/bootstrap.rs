use std::sync::Arc;

use anyhow::Result;
use fiat_application::{
    ConfessionService, JournalService, MoodSync, SessionProvider, SyncedStore, TruthBoard,
    UnavailableBackend,
};
use fiat_core::realtime::ChangeHub;
use fiat_infrastructure::config::BackendSettings;
use fiat_infrastructure::{
    AuthClient, FiatConfig, FiatPaths, LocalDatabase, RemoteClient, RemoteConfessionRepository,
    RemoteJournalRepository, RemoteMoodStore, RemoteTruthRepository, SessionFileStore,
    SqliteMoodStore,
};

use super::state::RemoteServices;
use super::AppState;

/// Composition root: builds the stores, the facades and the session provider,
/// then resolves the persisted session.
///
/// Without backend settings only the mood store is wired, on top of SQLite.
pub async fn bootstrap(paths: &FiatPaths, config: FiatConfig) -> Result<AppState> {
    // One lazily opened connection shared by every local store.
    let database = Arc::new(LocalDatabase::at_path(config.database_path(paths)));
    let local_moods = Arc::new(SqliteMoodStore::new(database));

    let backend = match config.backend_settings() {
        Ok(backend) => backend,
        Err(err) => {
            tracing::warn!("[Bootstrap] Backend is not configured, moods stay local: {}", err);
            let moods = MoodSync::new(SyncedStore::new(
                Arc::new(UnavailableBackend::new("remote", err.clone())),
                local_moods,
            ));
            return Ok(AppState {
                config,
                moods,
                remote: Err(err),
            });
        }
    };

    let (services, remote) = connect(paths, &config, backend)?;
    let moods = MoodSync::new(SyncedStore::new(
        Arc::new(RemoteMoodStore::new(remote)),
        local_moods,
    ));

    let state = services.session_provider.initialize().await;
    tracing::info!("[Bootstrap] Session resolved: {:?}", state.gate());

    Ok(AppState {
        config,
        moods,
        remote: Ok(services),
    })
}

fn connect(
    paths: &FiatPaths,
    config: &FiatConfig,
    backend: BackendSettings,
) -> Result<(RemoteServices, RemoteClient)> {
    let auth = AuthClient::new(backend.clone(), SessionFileStore::new(paths))?;
    let session_provider = Arc::new(SessionProvider::new(Arc::new(auth)));
    let session = session_provider.context();

    let remote = RemoteClient::new(backend.clone(), session.clone())?;

    let limits = config.limits;
    let journal = JournalService::new(
        Arc::new(RemoteJournalRepository::new(remote.clone())),
        limits.journal_list,
    );
    let confessions = ConfessionService::new(
        Arc::new(RemoteConfessionRepository::new(remote.clone())),
        limits.confession_list,
    );

    let change_hub = ChangeHub::new();
    let truths = TruthBoard::new(
        Arc::new(RemoteTruthRepository::new(remote.clone())),
        session,
        limits.truth_list,
    )
    .with_feed(Arc::new(change_hub.clone()));

    let services = RemoteServices {
        backend,
        session_provider,
        journal,
        confessions,
        truths,
        change_hub,
    };
    Ok((services, remote))
}
