use std::sync::Arc;

use fiat_application::{ConfessionService, JournalService, MoodSync, SessionProvider, TruthBoard};
use fiat_core::realtime::ChangeHub;
use fiat_core::FiatError;
use fiat_infrastructure::config::BackendSettings;
use fiat_infrastructure::FiatConfig;

/// Everything a command needs, wired once per process.
pub struct AppState {
    pub config: FiatConfig,
    /// Always usable; the remote side degrades to warnings.
    pub moods: MoodSync,
    pub(super) remote: Result<RemoteServices, FiatError>,
}

/// Services that only exist when the backend is configured.
pub struct RemoteServices {
    pub backend: BackendSettings,
    pub session_provider: Arc<SessionProvider>,
    pub journal: JournalService,
    pub confessions: ConfessionService,
    pub truths: TruthBoard,
    pub change_hub: ChangeHub,
}

impl AppState {
    /// The remote services, or the reason they could not be built.
    pub fn remote(&self) -> fiat_core::Result<&RemoteServices> {
        self.remote.as_ref().map_err(Clone::clone)
    }
}
