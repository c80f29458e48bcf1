pub mod game;
pub mod leaderboard;
pub mod sequence;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use tokio::{
    sync::{Mutex, RwLock},
    task::AbortHandle,
};
use tracing::{info, warn};

#[cfg(feature = "file-store")]
use crate::dao::kv_store::file::FileStore;
use crate::{
    config::{AppConfig, StorageConfig},
    dao::{
        kv_store::{KeyValueStore, memory::MemoryStore},
        language_store::LanguageStore,
        leaderboard_store::LeaderboardStore,
        score_store::ScoreStore,
    },
    i18n::{Localizer, Translate, detect_language},
    services::collaborators::{AudioCue, Presenter, SseCollaborator},
    state::{game::GameSession, leaderboard::LeaderboardManager},
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 64;

/// Central application state: the single game session, the leaderboard and the
/// collaborators that carry their side effects to clients.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn KeyValueStore>,
    session: RwLock<GameSession>,
    leaderboard: Mutex<LeaderboardManager>,
    scores: Arc<ScoreStore>,
    languages: LanguageStore,
    localizer: Arc<Localizer>,
    sse: Arc<SseHub>,
    presenter: Arc<dyn Presenter>,
    audio: Arc<dyn AudioCue>,
    playback_task: Mutex<Option<AbortHandle>>,
}

impl AppState {
    /// Build the state with the storage backend selected by `config`.
    pub fn new(config: AppConfig) -> SharedState {
        let store = open_store(config.storage());
        Self::with_store(config, store)
    }

    /// Build the state on top of an explicit key-value store. The display language is
    /// the saved choice when there is one, and translations come from the configured
    /// locales directory.
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> SharedState {
        let saved = LanguageStore::new(store.clone(), config.namespace()).load_language();
        let language = detect_language(saved.as_deref(), config.language());
        let localizer = Arc::new(Localizer::load(config.locales_dir().clone(), &language));
        Self::from_parts(config, store, localizer)
    }

    /// Build the state from fully specified dependencies.
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        localizer: Arc<Localizer>,
    ) -> SharedState {
        let scores = Arc::new(ScoreStore::new(store.clone(), config.namespace()));
        let leaderboard = LeaderboardManager::new(
            config.leaderboard_capacity(),
            LeaderboardStore::new(store.clone(), config.namespace()),
            scores.clone(),
            localizer.clone(),
        );
        let languages = LanguageStore::new(store.clone(), config.namespace());
        let session = GameSession::new(config.palette().clone(), config.lead_in_ms());

        let sse = Arc::new(SseHub::new(SSE_CAPACITY));
        let collaborator = Arc::new(SseCollaborator::new(sse.clone()));

        Arc::new(Self {
            config,
            store,
            session: RwLock::new(session),
            leaderboard: Mutex::new(leaderboard),
            scores,
            languages,
            localizer,
            sse,
            presenter: collaborator.clone(),
            audio: collaborator,
            playback_task: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The one game session owned by this server.
    pub fn session(&self) -> &RwLock<GameSession> {
        &self.session
    }

    pub fn leaderboard(&self) -> &Mutex<LeaderboardManager> {
        &self.leaderboard
    }

    /// Best-score persistence shared with the leaderboard.
    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn translator(&self) -> &dyn Translate {
        self.localizer.as_ref()
    }

    /// Switchable language behind [`Self::translator`].
    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn languages(&self) -> &LanguageStore {
        &self.languages
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    pub fn audio(&self) -> &dyn AudioCue {
        self.audio.as_ref()
    }

    /// Handle of the running playback driver, if any.
    pub fn playback_task(&self) -> &Mutex<Option<AbortHandle>> {
        &self.playback_task
    }

    /// Whether the storage backend currently fails its health check.
    pub fn is_degraded(&self) -> bool {
        match self.store.health_check() {
            Ok(()) => false,
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                true
            }
        }
    }
}

/// Open the configured backend, falling back to memory when it cannot be used.
fn open_store(storage: &StorageConfig) -> Arc<dyn KeyValueStore> {
    match storage {
        #[cfg(feature = "file-store")]
        StorageConfig::File { dir } => match FileStore::open(dir.clone()) {
            Ok(store) => {
                info!(dir = %dir.display(), "using file storage");
                Arc::new(store)
            }
            Err(err) => {
                warn!(
                    dir = %dir.display(),
                    error = %err,
                    "file storage unavailable; scores will not survive a restart"
                );
                Arc::new(MemoryStore::new())
            }
        },
        #[cfg(not(feature = "file-store"))]
        StorageConfig::File { dir } => {
            warn!(
                dir = %dir.display(),
                "built without file storage; scores will not survive a restart"
            );
            Arc::new(MemoryStore::new())
        }
        StorageConfig::Memory => {
            info!("using in-memory storage");
            Arc::new(MemoryStore::new())
        }
    }
}
