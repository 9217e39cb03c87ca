//! Scripted fakes for exercising the session layer without a live backend.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use washdesk_auth::{PermissionSet, UserRecord};

use crate::api::AuthBackend;
use crate::error::{AuthError, HttpError, RefreshError};
use crate::types::{LoginResponse, PermissionRecord, RefreshResponse};

/// Calls observed by the fake backend, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendCall {
    Login { email: String },
    Logout { access_token: String },
    Refresh { refresh_token: String },
    ListPermissions { access_token: String },
}

/// Backend double with scripted results and recorded interactions.
///
/// Results are queues consumed one per call; an exhausted queue yields a
/// rejection so a test that forgets to script a response fails loudly
/// instead of hanging.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    login_results: Mutex<VecDeque<Result<LoginResponse, AuthError>>>,
    refresh_results: Mutex<VecDeque<Result<RefreshResponse, RefreshError>>>,
    permissions: Mutex<Vec<PermissionRecord>>,
    logout_fails: AtomicBool,
    calls: Mutex<Vec<BackendCall>>,
    /// When set, `refresh` parks after recording its call until notified —
    /// lets race tests freeze an exchange mid-flight.
    refresh_gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_login(&self, result: Result<LoginResponse, AuthError>) {
        self.login_results.lock().await.push_back(result);
    }

    pub async fn push_refresh(&self, result: Result<RefreshResponse, RefreshError>) {
        self.refresh_results.lock().await.push_back(result);
    }

    pub async fn set_permissions(&self, records: Vec<PermissionRecord>) {
        *self.permissions.lock().await = records;
    }

    pub fn fail_logout(&self) {
        self.logout_fails.store(true, Ordering::SeqCst);
    }

    /// Install the refresh gate. Must be called before the backend is shared.
    pub fn gate_refresh(&mut self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.refresh_gate = Some(gate.clone());
        gate
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().await.clone()
    }

    pub async fn refresh_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, BackendCall::Refresh { .. }))
            .count()
    }
}

#[async_trait]
impl AuthBackend for ScriptedBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, AuthError> {
        self.calls.lock().await.push(BackendCall::Login {
            email: email.to_owned(),
        });
        self.login_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(AuthError::Rejected {
                    status: 401,
                    reason: "no scripted login response".into(),
                })
            })
    }

    async fn logout(&self, access_token: &str) -> Result<(), HttpError> {
        self.calls.lock().await.push(BackendCall::Logout {
            access_token: access_token.to_owned(),
        });
        if self.logout_fails.load(Ordering::SeqCst) {
            Err(HttpError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        self.calls.lock().await.push(BackendCall::Refresh {
            refresh_token: refresh_token.to_owned(),
        });
        if let Some(gate) = &self.refresh_gate {
            gate.notified().await;
        }
        self.refresh_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(RefreshError::Rejected {
                    status: 401,
                    message: "no scripted refresh response".into(),
                })
            })
    }

    async fn list_permissions(
        &self,
        access_token: &str,
    ) -> Result<Vec<PermissionRecord>, HttpError> {
        self.calls.lock().await.push(BackendCall::ListPermissions {
            access_token: access_token.to_owned(),
        });
        Ok(self.permissions.lock().await.clone())
    }
}

pub(crate) fn sample_user(id: i64, email: &str, permissions: &[&str]) -> UserRecord {
    UserRecord {
        id,
        name: format!("User {id}"),
        email: email.to_owned(),
        role: None,
        permissions: permissions.iter().copied().collect::<PermissionSet>(),
    }
}

pub(crate) fn login_response(access: &str, refresh: &str, user: UserRecord) -> LoginResponse {
    LoginResponse {
        access_token: access.to_owned(),
        refresh_token: refresh.to_owned(),
        user,
    }
}

pub(crate) fn refresh_response(access: &str, rotated: Option<&str>) -> RefreshResponse {
    RefreshResponse {
        access_token: access.to_owned(),
        refresh_token: rotated.map(str::to_owned),
    }
}
