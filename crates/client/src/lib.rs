//! `washdesk-client`
//!
//! **Responsibility:** the dashboard's session/authorization core.
//!
//! This crate provides:
//! - Session lifecycle (restore/login/logout) mirrored to durable storage
//! - A background token refresh loop (fail closed on refresh failure)
//! - Authenticated fetch against the backend API
//! - The permission directory backing menu visibility
//!
//! The client is a **thin shell** around the backend API: every
//! authorization decision is re-derived from the latest session snapshot,
//! and the session store is the only writer of session state.

pub mod api;
pub mod app;
pub mod config;
pub mod directory;
pub mod error;
pub mod fetch;
pub mod refresh;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, AuthBackend};
pub use app::AppState;
pub use config::Config;
pub use directory::{PermissionDirectory, PermissionSourcing};
pub use error::{AuthError, HttpError, RefreshError};
pub use fetch::AuthenticatedFetch;
pub use refresh::{RefreshWorker, DEFAULT_REFRESH_INTERVAL};
pub use session::{RefreshOutcome, Session, SessionHandle, SessionStore};
pub use storage::{MemoryStorage, PersistedSession, SessionStorage, SqliteStorage};
