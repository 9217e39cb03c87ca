//! Authenticated calls to the dashboard backend.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use washdesk_auth::UserRecord;

use crate::api::ApiClient;
use crate::error::HttpError;
use crate::session::SessionHandle;
use crate::types::{PermissionRecord, RoleRecord};

/// Thin wrapper attaching the live session's bearer token to every request.
///
/// The token is read from the session handle per call, so a refresh landing
/// between two calls is picked up by the second one automatically. A 401 is
/// surfaced like any other error status; it never triggers an on-demand
/// refresh — the refresh loop is the sole refresh trigger.
#[derive(Clone)]
pub struct AuthenticatedFetch {
    api: Arc<ApiClient>,
    session: SessionHandle,
}

impl AuthenticatedFetch {
    pub fn new(api: Arc<ApiClient>, session: SessionHandle) -> Self {
        Self { api, session }
    }

    /// Issue `method endpoint` with the current access token attached.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let token = self.session.access_token().await;
        self.api.call(method, endpoint, token.as_deref(), body).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, HttpError> {
        self.call(Method::GET, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, HttpError> {
        self.call(Method::POST, endpoint, Some(body)).await
    }

    /// GET `/auth/me` — the backend's view of the signed-in user.
    pub async fn current_user(&self) -> Result<UserRecord, HttpError> {
        let value = self.get("/auth/me").await?;
        serde_json::from_value(value).map_err(|e| HttpError::Parse(e.to_string()))
    }

    /// GET `/permissions/all`.
    pub async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, HttpError> {
        let value = self.get("/permissions/all").await?;
        serde_json::from_value(value).map_err(|e| HttpError::Parse(e.to_string()))
    }

    /// GET `/roles/all`.
    pub async fn list_roles(&self) -> Result<Vec<RoleRecord>, HttpError> {
        let value = self.get("/roles/all").await?;
        serde_json::from_value(value).map_err(|e| HttpError::Parse(e.to_string()))
    }
}
