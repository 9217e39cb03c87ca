//! Error taxonomy for the session/authorization subsystem.

use thiserror::Error;

/// Login failure. The prior session (if any) is left untouched.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credential exchange.
    #[error("login rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// The backend answered 2xx but the body did not decode.
    #[error("malformed login response: {0}")]
    MalformedResponse(String),

    #[error("network error during login: {0}")]
    Network(String),

    /// The session could not be persisted; nothing was committed.
    #[error("failed to persist session: {0}")]
    Storage(String),
}

/// Refresh failure. Never surfaced to callers directly; the session layer
/// converts it into a forced logout (fail closed).
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed refresh response: {0}")]
    MalformedResponse(String),

    #[error("network error during refresh: {0}")]
    Network(String),
}

/// Failure of an authenticated API call.
///
/// Propagated to the calling screen for display; never causes an automatic
/// logout by itself.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-2xx response, carrying the backend's message when it sent one.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}
