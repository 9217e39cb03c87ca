//! Permission directory: the granted-permission snapshot and its sourcing.

use washdesk_auth::{Permission, PermissionSet, UserRecord};

use crate::api::AuthBackend;
use crate::error::HttpError;
use crate::session::Session;
use crate::types::PermissionRecord;

/// Where the set of granted permissions comes from.
///
/// Depends on the backend version: newer backends embed the grants on the
/// user record, older ones serve them from `/permissions/all`. Exactly one
/// mode is wired per deployment; the modes are never mixed at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionSourcing {
    /// Grants embedded on the authenticated user record.
    #[default]
    Embedded,
    /// Grants fetched from the dedicated endpoint after authentication.
    Fetched,
}

/// Immutable snapshot of the permissions granted to the current user.
///
/// Lookups are pure and synchronous — building the snapshot is the only
/// place network I/O can happen, and only in `Fetched` mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionDirectory {
    granted: PermissionSet,
}

impl PermissionDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_user(user: &UserRecord) -> Self {
        Self {
            granted: user.permissions.clone(),
        }
    }

    pub fn from_records(records: Vec<PermissionRecord>) -> Self {
        Self {
            granted: records
                .into_iter()
                .map(|record| Permission::from(record.name))
                .collect(),
        }
    }

    /// Build the directory for `session` according to `sourcing`. An
    /// anonymous session always yields an empty directory.
    pub async fn load(
        sourcing: PermissionSourcing,
        session: &Session,
        backend: &dyn AuthBackend,
    ) -> Result<Self, HttpError> {
        let Session::Authenticated {
            access_token, user, ..
        } = session
        else {
            return Ok(Self::empty());
        };

        match sourcing {
            PermissionSourcing::Embedded => Ok(Self::from_user(user)),
            PermissionSourcing::Fetched => {
                let records = backend.list_permissions(access_token).await?;
                Ok(Self::from_records(records))
            }
        }
    }

    /// Pure, synchronous lookup over the snapshot.
    pub fn has_permission(&self, name: &str) -> bool {
        self.granted.has(name)
    }

    pub fn granted(&self) -> &PermissionSet {
        &self.granted
    }
}
