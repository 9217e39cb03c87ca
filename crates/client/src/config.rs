//! Client configuration.

use std::time::Duration;

use crate::directory::PermissionSourcing;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;

/// Environment variable selecting the backend origin — the only externally
/// visible configuration of this subsystem.
pub const API_URL_ENV: &str = "WASHDESK_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Static configuration for the dashboard client.
///
/// The refresh cadence and permission sourcing are deployment decisions made
/// in code, not environment knobs.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub refresh_interval: Duration,
    pub permission_sourcing: PermissionSourcing,
}

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            permission_sourcing: PermissionSourcing::default(),
        }
    }

    /// Read the backend origin from `WASHDESK_API_URL`, falling back to the
    /// local development default.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(api_url)
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_permission_sourcing(mut self, sourcing: PermissionSourcing) -> Self {
        self.permission_sourcing = sourcing;
        self
    }
}
