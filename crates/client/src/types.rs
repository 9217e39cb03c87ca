//! Wire shapes exchanged with the backend.

use serde::{Deserialize, Serialize};

use washdesk_auth::UserRecord;

/// Successful login exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

/// Successful refresh exchange.
///
/// The backend may rotate the refresh token; when `refresh_token` is absent
/// the old one stays valid for the next cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Row of `GET /permissions/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: i64,
    pub name: String,
}

/// Row of `GET /roles/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}
