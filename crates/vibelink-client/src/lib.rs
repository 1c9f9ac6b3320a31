//! VibeLink client core.
//!
//! Everything a VibeLink front end needs below the view layer: the session
//! manager with refresh-and-replay, typed REST wrappers, the application
//! state container, and the commands that tie them together (optimistic
//! updates, pagination, polling, debounced search).

pub mod api;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod discovery;
pub mod error;
pub mod events;
pub mod http;
pub mod local;
pub mod optimistic;
pub mod pagination;
pub mod polling;
pub mod session;
pub mod state;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use vibelink_store::Database;

pub use config::ClientConfig;
pub use error::ClientError;
pub use state::{Action, AppState, Store};

use crate::debounce::Debouncer;
use crate::http::{HttpTransport, Transport};
use crate::local::{LocalState, SqliteState};
use crate::optimistic::ProvisionalIds;
use crate::pagination::LoadGate;
use crate::session::SessionManager;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vibelink_client=debug,vibelink_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// One load-more in flight per paged list.
#[derive(Debug, Default)]
pub(crate) struct LoadGates {
    pub feed: LoadGate,
    pub user_posts: LoadGate,
    pub older_messages: LoadGate,
    pub email: LoadGate,
    pub ai: LoadGate,
}

/// Handle to a running client. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    session: Arc<SessionManager>,
    local: Arc<dyn LocalState>,
    store: Store,
    ids: Arc<ProvisionalIds>,
    gates: Arc<LoadGates>,
    search_debounce: Arc<Debouncer>,
    shutdown: CancellationToken,
}

impl Client {
    /// Assemble a client over explicit transport and storage.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, local: Arc<dyn LocalState>) -> Self {
        let session = Arc::new(SessionManager::new(transport, local.clone()));
        let search_debounce = Arc::new(Debouncer::new(config.search_debounce));
        Self {
            config: Arc::new(config),
            session,
            local,
            store: Store::new(),
            ids: Arc::new(ProvisionalIds::new()),
            gates: Arc::new(LoadGates::default()),
            search_debounce,
            shutdown: CancellationToken::new(),
        }
    }

    /// Production wiring: reqwest transport, SQLite storage, session
    /// watcher, and a restored session if one was stored.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.api_base_url, config.request_timeout)?;
        let db = match &config.data_dir {
            Some(dir) => Database::open_in(dir)?,
            None => Database::new()?,
        };
        tracing::info!(api = %config.api_base_url, "starting VibeLink client");

        let client = Self::new(config, Arc::new(transport), Arc::new(SqliteState::new(db)));
        client.watch_session();
        client.initialize().await;
        Ok(client)
    }

    /// Reset the store whenever the session expires, until [`Client::shutdown`].
    pub fn watch_session(&self) -> JoinHandle<()> {
        events::spawn_session_watcher(
            self.session.subscribe(),
            self.store.clone(),
            self.shutdown.child_token(),
        )
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> AppState {
        self.store.snapshot()
    }

    /// Apply a local-only action (pushed notifications, deck moves, edits).
    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    /// Stop background tasks started by this client.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
