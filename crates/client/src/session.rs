//! Session state and its single writer.

use std::sync::Arc;

use tokio::sync::RwLock;

use washdesk_auth::UserRecord;

use crate::api::AuthBackend;
use crate::error::AuthError;
use crate::storage::{PersistedSession, SessionStorage};

/// Live session state: authenticated or anonymous, never in between.
///
/// The shape enforces the session invariant structurally — an access token
/// cannot exist without a user record. The refresh token may be absent on a
/// restored session whose persisted record lost it; the refresh loop then
/// has nothing to exchange and leaves the session alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        access_token: String,
        refresh_token: Option<String>,
        user: UserRecord,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { access_token, .. } => Some(access_token),
        }
    }

    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { refresh_token, .. } => refresh_token.as_deref(),
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { user, .. } => Some(user),
        }
    }

    pub(crate) fn to_persisted(&self) -> Result<PersistedSession, serde_json::Error> {
        match self {
            Session::Anonymous => Ok(PersistedSession::default()),
            Session::Authenticated {
                access_token,
                refresh_token,
                user,
            } => Ok(PersistedSession {
                token: Some(access_token.clone()),
                refresh_token: refresh_token.clone(),
                user: Some(serde_json::to_string(user)?),
            }),
        }
    }
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was committed.
    Refreshed,
    /// No refresh token held; nothing was exchanged.
    NoSession,
    /// The exchange failed; the session was torn down (fail closed).
    SessionEnded,
    /// A login or logout raced the exchange; its result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    /// Bumped whenever the session generation changes (login, logout,
    /// restore). A refresh commits only against the epoch it started from.
    epoch: u64,
}

/// Cheap cloneable read view over the live session.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .session
            .access_token()
            .map(str::to_owned)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_authenticated()
    }
}

/// Single writer for session state.
///
/// Every mutation of the token pair is mirrored to durable storage before
/// the in-memory commit, so a restart observes the latest state. Consumers
/// (permission directory, navigation, authenticated fetch) only ever read
/// snapshots through [`SessionHandle`].
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            backend,
            storage,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: self.state.clone(),
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.session.clone()
    }

    /// Adopt the persisted session, if a complete one exists.
    ///
    /// Missing keys, corrupt JSON, and storage failures all degrade to the
    /// anonymous session; this never fails the caller.
    pub async fn restore(&self) {
        let record = match self.storage.load().await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("failed to load persisted session: {err:?}");
                return;
            }
        };

        let PersistedSession {
            token: Some(access_token),
            refresh_token,
            user: Some(user_json),
        } = record
        else {
            tracing::debug!("no complete persisted session to restore");
            return;
        };

        let user: UserRecord = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!("persisted user record is corrupt, discarding session: {err}");
                return;
            }
        };

        let email = user.email.clone();
        let mut state = self.state.write().await;
        state.session = Session::Authenticated {
            access_token,
            refresh_token,
            user,
        };
        state.epoch += 1;
        drop(state);

        tracing::info!(email, "restored persisted session");
    }

    /// Exchange credentials for a session.
    ///
    /// On success the triple is persisted before the in-memory commit; on
    /// any failure the prior session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self.backend.login(email, password).await?;

        let session = Session::Authenticated {
            access_token: response.access_token,
            refresh_token: Some(response.refresh_token),
            user: response.user,
        };

        let record = session
            .to_persisted()
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .save(&record)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut state = self.state.write().await;
        state.session = session.clone();
        state.epoch += 1;
        drop(state);

        tracing::info!(email, "signed in");
        Ok(session)
    }

    /// End the session.
    ///
    /// The backend notification is best effort; local state and durable
    /// storage are cleared unconditionally.
    pub async fn logout(&self) {
        // Claim the session end first so an in-flight refresh cannot
        // resurrect the cleared session.
        let access_token = {
            let mut state = self.state.write().await;
            state.epoch += 1;
            let token = state.session.access_token().map(str::to_owned);
            state.session = Session::Anonymous;
            token
        };

        if let Some(token) = access_token {
            if let Err(err) = self.backend.logout(&token).await {
                tracing::warn!("backend logout failed (token may already be expired): {err}");
            }
        }

        if let Err(err) = self.storage.clear().await {
            tracing::warn!("failed to clear persisted session: {err:?}");
        }

        tracing::info!("signed out");
    }

    /// One refresh cycle: exchange the refresh token for a new access token.
    ///
    /// No retry within a cycle — a failed exchange ends the session rather
    /// than leaving a soon-to-expire access token in place.
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let (refresh_token, started_epoch) = {
            let state = self.state.read().await;
            (
                state.session.refresh_token().map(str::to_owned),
                state.epoch,
            )
        };

        let Some(refresh_token) = refresh_token else {
            return RefreshOutcome::NoSession;
        };

        let response = match self.backend.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("token refresh failed, ending session: {err}");
                self.logout().await;
                return RefreshOutcome::SessionEnded;
            }
        };

        let mut state = self.state.write().await;
        if state.epoch != started_epoch {
            tracing::debug!("refresh result discarded, session changed mid-flight");
            return RefreshOutcome::Superseded;
        }

        let updated = match &state.session {
            Session::Authenticated {
                refresh_token: held,
                user,
                ..
            } => Session::Authenticated {
                access_token: response.access_token,
                refresh_token: response.refresh_token.or_else(|| held.clone()),
                user: user.clone(),
            },
            Session::Anonymous => return RefreshOutcome::Superseded,
        };

        match updated.to_persisted() {
            Ok(record) => {
                // Persist failures are logged; the next cycle re-persists.
                if let Err(err) = self.storage.save(&record).await {
                    tracing::error!("failed to persist refreshed tokens: {err:?}");
                }
            }
            Err(err) => tracing::error!("failed to encode refreshed session: {err}"),
        }

        state.session = updated;
        tracing::debug!("access token refreshed");
        RefreshOutcome::Refreshed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::RefreshError;
    use crate::storage::MemoryStorage;
    use crate::test_support::{
        login_response, refresh_response, sample_user, BackendCall, ScriptedBackend,
    };

    use super::*;

    fn store_with(
        backend: Arc<ScriptedBackend>,
        storage: Arc<MemoryStorage>,
    ) -> SessionStore {
        SessionStore::new(backend, storage)
    }

    async fn signed_in_store() -> (SessionStore, Arc<ScriptedBackend>, Arc<MemoryStorage>) {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(backend.clone(), storage.clone());

        backend
            .push_login(Ok(login_response(
                "access-1",
                "refresh-1",
                sample_user(1, "asha@suds.example", &["orders.index"]),
            )))
            .await;
        store.login("asha@suds.example", "hunter2").await.unwrap();
        (store, backend, storage)
    }

    #[tokio::test]
    async fn restore_adopts_a_complete_persisted_triple() {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());

        let user = sample_user(1, "asha@suds.example", &["orders.index"]);
        let persisted = PersistedSession {
            token: Some("access-1".into()),
            refresh_token: Some("refresh-1".into()),
            user: Some(serde_json::to_string(&user).unwrap()),
        };
        storage.save(&persisted).await.unwrap();

        let store = store_with(backend, storage);
        store.restore().await;

        assert_eq!(
            store.snapshot().await,
            Session::Authenticated {
                access_token: "access-1".into(),
                refresh_token: Some("refresh-1".into()),
                user,
            }
        );
    }

    #[tokio::test]
    async fn restore_with_any_required_key_absent_stays_anonymous() {
        let user_json = serde_json::to_string(&sample_user(1, "a@suds.example", &[])).unwrap();
        let partial_records = [
            PersistedSession::default(),
            PersistedSession {
                token: Some("access-1".into()),
                ..Default::default()
            },
            PersistedSession {
                user: Some(user_json),
                ..Default::default()
            },
        ];

        for record in partial_records {
            let backend = Arc::new(ScriptedBackend::new());
            let storage = Arc::new(MemoryStorage::new());
            storage.save(&record).await.unwrap();

            let store = store_with(backend, storage);
            store.restore().await;
            assert_eq!(store.snapshot().await, Session::Anonymous);
        }
    }

    #[tokio::test]
    async fn restore_swallows_corrupt_user_json() {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(&PersistedSession {
                token: Some("access-1".into()),
                refresh_token: Some("refresh-1".into()),
                user: Some("{not json".into()),
            })
            .await
            .unwrap();

        let store = store_with(backend, storage);
        store.restore().await;
        assert_eq!(store.snapshot().await, Session::Anonymous);
    }

    #[tokio::test]
    async fn login_persists_the_triple_and_commits() {
        let (store, _backend, storage) = signed_in_store().await;

        let session = store.snapshot().await;
        assert_eq!(session.access_token(), Some("access-1"));
        assert_eq!(session.refresh_token(), Some("refresh-1"));

        let persisted = storage.load().await.unwrap();
        assert_eq!(persisted.token.as_deref(), Some("access-1"));
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-1"));
        let stored_user: UserRecord =
            serde_json::from_str(persisted.user.as_deref().unwrap()).unwrap();
        assert_eq!(stored_user.email, "asha@suds.example");
    }

    #[tokio::test]
    async fn failed_login_leaves_the_prior_session_untouched() {
        let (store, backend, storage) = signed_in_store().await;
        let before_session = store.snapshot().await;
        let before_storage = storage.load().await.unwrap();

        backend
            .push_login(Err(AuthError::Rejected {
                status: 401,
                reason: "invalid credentials".into(),
            }))
            .await;

        let result = store.login("asha@suds.example", "wrong").await;
        assert!(matches!(result, Err(AuthError::Rejected { status: 401, .. })));

        assert_eq!(store.snapshot().await, before_session);
        assert_eq!(storage.load().await.unwrap(), before_storage);
    }

    #[tokio::test]
    async fn failed_login_from_empty_session_touches_nothing() {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(backend.clone(), storage.clone());

        backend
            .push_login(Err(AuthError::Rejected {
                status: 401,
                reason: "invalid credentials".into(),
            }))
            .await;

        assert!(store.login("a@x.com", "bad").await.is_err());
        assert_eq!(store.snapshot().await, Session::Anonymous);
        assert_eq!(storage.load().await.unwrap(), PersistedSession::default());
    }

    #[tokio::test]
    async fn logout_clears_state_even_when_the_backend_call_fails() {
        let (store, backend, storage) = signed_in_store().await;
        backend.fail_logout();

        store.logout().await;

        assert_eq!(store.snapshot().await, Session::Anonymous);
        assert_eq!(storage.load().await.unwrap(), PersistedSession::default());

        let calls = backend.calls().await;
        assert!(calls.contains(&BackendCall::Logout {
            access_token: "access-1".into()
        }));
    }

    #[tokio::test]
    async fn anonymous_logout_skips_the_backend_notification() {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(backend.clone(), storage);

        store.logout().await;

        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn refresh_without_a_token_makes_no_network_call() {
        let backend = Arc::new(ScriptedBackend::new());
        let storage = Arc::new(MemoryStorage::new());

        // Persisted record with no refresh token: session restores, but the
        // refresh cycle has nothing to exchange.
        let user = sample_user(1, "asha@suds.example", &[]);
        storage
            .save(&PersistedSession {
                token: Some("access-1".into()),
                refresh_token: None,
                user: Some(serde_json::to_string(&user).unwrap()),
            })
            .await
            .unwrap();

        let store = store_with(backend.clone(), storage);
        store.restore().await;

        assert_eq!(store.refresh_once().await, RefreshOutcome::NoSession);
        assert!(backend.calls().await.is_empty());
        assert!(store.snapshot().await.is_authenticated());
    }

    #[tokio::test]
    async fn refresh_without_rotation_keeps_the_old_refresh_token() {
        let (store, backend, storage) = signed_in_store().await;

        backend
            .push_refresh(Ok(refresh_response("access-2", None)))
            .await;

        assert_eq!(store.refresh_once().await, RefreshOutcome::Refreshed);

        let session = store.snapshot().await;
        assert_eq!(session.access_token(), Some("access-2"));
        assert_eq!(session.refresh_token(), Some("refresh-1"));

        let persisted = storage.load().await.unwrap();
        assert_eq!(persisted.token.as_deref(), Some("access-2"));
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn refresh_rotation_replaces_the_stored_token_and_never_reuses_the_old_one() {
        let (store, backend, storage) = signed_in_store().await;
        let handle = store.handle();

        backend
            .push_refresh(Ok(refresh_response("access-2", Some("refresh-2"))))
            .await;
        assert_eq!(store.refresh_once().await, RefreshOutcome::Refreshed);

        // Subsequent authenticated calls see the new access token.
        assert_eq!(handle.access_token().await.as_deref(), Some("access-2"));
        assert_eq!(
            storage.load().await.unwrap().refresh_token.as_deref(),
            Some("refresh-2")
        );

        // The next cycle exchanges the rotated token, not the original.
        backend
            .push_refresh(Ok(refresh_response("access-3", None)))
            .await;
        assert_eq!(store.refresh_once().await, RefreshOutcome::Refreshed);

        let refresh_tokens: Vec<String> = backend
            .calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Refresh { refresh_token } => Some(refresh_token),
                _ => None,
            })
            .collect();
        assert_eq!(refresh_tokens, vec!["refresh-1", "refresh-2"]);
    }

    #[tokio::test]
    async fn failed_refresh_fails_closed_within_the_same_cycle() {
        let (store, backend, storage) = signed_in_store().await;

        backend
            .push_refresh(Err(RefreshError::Network("connection reset".into())))
            .await;

        assert_eq!(store.refresh_once().await, RefreshOutcome::SessionEnded);
        assert_eq!(store.snapshot().await, Session::Anonymous);
        assert_eq!(storage.load().await.unwrap(), PersistedSession::default());
    }

    #[tokio::test]
    async fn rejected_refresh_also_ends_the_session() {
        let (store, backend, _storage) = signed_in_store().await;

        backend
            .push_refresh(Err(RefreshError::Rejected {
                status: 401,
                message: "refresh token revoked".into(),
            }))
            .await;

        assert_eq!(store.refresh_once().await, RefreshOutcome::SessionEnded);
        assert!(!store.snapshot().await.is_authenticated());
    }

    #[tokio::test]
    async fn refresh_raced_by_logout_commits_nothing() {
        let mut backend = ScriptedBackend::new();
        let gate = backend.gate_refresh();
        let backend = Arc::new(backend);
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(backend.clone(), storage.clone());

        backend
            .push_login(Ok(login_response(
                "access-1",
                "refresh-1",
                sample_user(1, "asha@suds.example", &[]),
            )))
            .await;
        store.login("asha@suds.example", "hunter2").await.unwrap();

        backend
            .push_refresh(Ok(refresh_response("access-2", Some("refresh-2"))))
            .await;

        let racing = store.clone();
        let task = tokio::spawn(async move { racing.refresh_once().await });

        // Wait for the refresh to reach the gated backend call.
        while backend.refresh_calls().await == 0 {
            tokio::task::yield_now().await;
        }

        store.logout().await;
        gate.notify_one();

        assert_eq!(task.await.unwrap(), RefreshOutcome::Superseded);
        assert_eq!(store.snapshot().await, Session::Anonymous);
        assert_eq!(storage.load().await.unwrap(), PersistedSession::default());
    }
}
