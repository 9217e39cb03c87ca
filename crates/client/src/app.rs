//! Top-level client state.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use washdesk_nav::{menu, MenuSection};

use crate::api::{ApiClient, AuthBackend};
use crate::config::Config;
use crate::directory::{PermissionDirectory, PermissionSourcing};
use crate::error::AuthError;
use crate::fetch::AuthenticatedFetch;
use crate::refresh::RefreshWorker;
use crate::session::{SessionHandle, SessionStore};
use crate::storage::{SessionStorage, SqliteStorage};

/// Application state shared by every screen of the dashboard.
///
/// Owns the single-writer session store, manages the refresh worker
/// lifecycle, and derives the permission directory and the visible menu from
/// the latest session snapshot.
pub struct AppState {
    config: Config,
    api: Arc<ApiClient>,
    backend: Arc<dyn AuthBackend>,
    store: SessionStore,
    /// Directory loaded at sign-in; only meaningful in `Fetched` sourcing.
    fetched_directory: RwLock<PermissionDirectory>,
    refresh: Mutex<Option<(RefreshWorker, JoinHandle<()>)>>,
}

impl AppState {
    /// Build from configuration, persisting sessions under the platform
    /// data directory.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let storage = Arc::new(SqliteStorage::new()?);
        Ok(Self::with_storage(config, storage))
    }

    /// Build with explicit storage (in-memory for ephemeral deployments).
    pub fn with_storage(config: Config, storage: Arc<dyn SessionStorage>) -> Self {
        let api = Arc::new(ApiClient::new(config.api_url.clone()));
        let backend: Arc<dyn AuthBackend> = api.clone();
        Self::assemble(config, api, backend, storage)
    }

    /// Build with an explicit backend implementation (embedding, tests).
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let api = Arc::new(ApiClient::new(config.api_url.clone()));
        Self::assemble(config, api, backend, storage)
    }

    fn assemble(
        config: Config,
        api: Arc<ApiClient>,
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let store = SessionStore::new(backend.clone(), storage);
        Self {
            config,
            api,
            backend,
            store,
            fetched_directory: RwLock::new(PermissionDirectory::empty()),
            refresh: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session(&self) -> SessionHandle {
        self.store.handle()
    }

    /// Restore any persisted session. A restored session brings the refresh
    /// loop and the permission directory up, exactly like a fresh sign-in.
    pub async fn restore(&self) {
        self.store.restore().await;
        if self.store.snapshot().await.is_authenticated() {
            self.reload_fetched_directory().await;
            self.start_refresh().await;
        }
    }

    /// Sign in and bring the refresh loop + permission directory up.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.store.login(email, password).await?;
        self.reload_fetched_directory().await;
        self.start_refresh().await;
        Ok(())
    }

    /// Sign out: stop the refresh loop first so it cannot race the logout,
    /// then clear the session.
    pub async fn sign_out(&self) {
        self.stop_refresh().await;
        self.store.logout().await;
        *self.fetched_directory.write().await = PermissionDirectory::empty();
    }

    /// Process teardown: cancel the refresh loop without touching the
    /// session, so the persisted state survives for the next start.
    pub async fn shutdown(&self) {
        self.stop_refresh().await;
    }

    /// Current permission snapshot.
    ///
    /// `Embedded` re-derives from the live session on every call; `Fetched`
    /// returns the directory loaded at sign-in.
    pub async fn permissions(&self) -> PermissionDirectory {
        match self.config.permission_sourcing {
            PermissionSourcing::Embedded => {
                let session = self.store.snapshot().await;
                match session.user() {
                    Some(user) => PermissionDirectory::from_user(user),
                    None => PermissionDirectory::empty(),
                }
            }
            PermissionSourcing::Fetched => self.fetched_directory.read().await.clone(),
        }
    }

    /// The menu sections visible to the current user, re-derived from the
    /// latest snapshot on every call.
    pub async fn visible_menu(&self) -> Vec<MenuSection> {
        let directory = self.permissions().await;
        washdesk_nav::visible_sections(&menu::default_menu(), directory.granted())
    }

    /// Authenticated fetch bound to the live session.
    pub fn fetch(&self) -> AuthenticatedFetch {
        AuthenticatedFetch::new(self.api.clone(), self.store.handle())
    }

    async fn reload_fetched_directory(&self) {
        if self.config.permission_sourcing != PermissionSourcing::Fetched {
            return;
        }

        let session = self.store.snapshot().await;
        match PermissionDirectory::load(
            PermissionSourcing::Fetched,
            &session,
            self.backend.as_ref(),
        )
        .await
        {
            Ok(directory) => *self.fetched_directory.write().await = directory,
            Err(err) => tracing::warn!("failed to fetch the permission directory: {err}"),
        }
    }

    async fn start_refresh(&self) {
        let mut guard = self.refresh.lock().await;
        if guard.is_some() {
            return;
        }
        let worker =
            RefreshWorker::with_interval(self.store.clone(), self.config.refresh_interval);
        let handle = worker.start();
        *guard = Some((worker, handle));
    }

    async fn stop_refresh(&self) {
        let mut guard = self.refresh.lock().await;
        if let Some((worker, handle)) = guard.take() {
            worker.shutdown();
            if let Err(err) = handle.await {
                tracing::warn!("refresh loop task failed: {err}");
            }
        }
    }
}
