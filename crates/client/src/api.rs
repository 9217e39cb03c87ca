//! HTTP client for the dashboard backend.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::{AuthError, HttpError, RefreshError};
use crate::types::{LoginResponse, PermissionRecord, RefreshResponse};

/// Remote endpoints the session layer depends on.
///
/// Kept behind a trait so the session store, refresh loop, and permission
/// directory can be driven against a scripted backend in tests.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// POST `/auth/login`.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// POST `/auth/logout`. Server-side invalidation of the refresh token;
    /// callers treat failures as best-effort.
    async fn logout(&self, access_token: &str) -> Result<(), HttpError>;

    /// POST `/auth/refresh-token`.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError>;

    /// GET `/permissions/all`.
    async fn list_permissions(&self, access_token: &str)
    -> Result<Vec<PermissionRecord>, HttpError>;
}

/// `reqwest`-backed client for the dashboard backend.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the JSON body.
    ///
    /// `endpoint` is an absolute path such as `/auth/me`. Non-2xx responses
    /// surface the backend's `message`/`error` field when present, else a
    /// generic message. An empty 2xx body decodes to `Value::Null`.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Api {
                status: status.as_u16(),
                message: extract_error_message(status.as_u16(), &body),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Parse(e.to_string()))
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend reports errors as `{"message": "..."}` (older versions use
/// `{"error": "..."}`); anything else falls back to a generic message.
fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .call(Method::POST, "/auth/login", None, Some(&body))
            .await
            .map_err(|err| match err {
                HttpError::Api { status, message } => AuthError::Rejected {
                    status,
                    reason: message,
                },
                HttpError::Network(msg) => AuthError::Network(msg),
                HttpError::Parse(msg) => AuthError::MalformedResponse(msg),
            })?;

        serde_json::from_value(value).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }

    async fn logout(&self, access_token: &str) -> Result<(), HttpError> {
        self.call(Method::POST, "/auth/logout", Some(access_token), None)
            .await
            .map(|_| ())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let value = self
            .call(Method::POST, "/auth/refresh-token", None, Some(&body))
            .await
            .map_err(|err| match err {
                HttpError::Api { status, message } => RefreshError::Rejected { status, message },
                HttpError::Network(msg) => RefreshError::Network(msg),
                HttpError::Parse(msg) => RefreshError::MalformedResponse(msg),
            })?;

        serde_json::from_value(value).map_err(|e| RefreshError::MalformedResponse(e.to_string()))
    }

    async fn list_permissions(
        &self,
        access_token: &str,
    ) -> Result<Vec<PermissionRecord>, HttpError> {
        let value = self
            .call(Method::GET, "/permissions/all", Some(access_token), None)
            .await?;
        serde_json::from_value(value).map_err(|e| HttpError::Parse(e.to_string()))
    }
}
