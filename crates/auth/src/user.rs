use serde::{Deserialize, Serialize};

use crate::PermissionSet;

/// Authenticated user record as returned by the backend.
///
/// `permissions` is embedded only by newer backend versions; older ones omit
/// it and serve the grant list from a dedicated endpoint instead, so both
/// `role` and `permissions` default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "PermissionSet::is_empty")]
    pub permissions: PermissionSet,
}
