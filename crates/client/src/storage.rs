//! Durable storage for the persisted session.
//!
//! The backend of record is a small SQLite key/value table holding the
//! `token` / `refresh_token` / `user` triple; an in-memory implementation
//! backs ephemeral sessions and tests.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

const TOKEN_KEY: &str = "token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_KEY: &str = "user";

/// Persisted session triple, raw as stored (`user` stays JSON-encoded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<String>,
}

impl PersistedSession {
    /// A restorable record holds at least the access token and the user.
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Durable key/value storage for the session triple.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> anyhow::Result<PersistedSession>;

    /// Replace the stored triple. Absent fields delete their keys, so a
    /// reload observes exactly what was saved.
    async fn save(&self, record: &PersistedSession) -> anyhow::Result<()>;

    async fn clear(&self) -> anyhow::Result<()>;
}

/// SQLite-backed storage.
///
/// The pool is opened lazily on first use; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStorage {
    /// Storage at the default location `<data dir>/washdesk/session.db`.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::at_path(default_db_path()?))
    }

    /// Storage at an explicit database path.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            pool: Arc::new(Mutex::new(None)),
        }
    }

    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session store directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open session store at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create session_state table")?;

        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl SessionStorage for SqliteStorage {
    async fn load(&self) -> anyhow::Result<PersistedSession> {
        let pool = self.pool().await?;

        let rows = sqlx::query("SELECT key, value FROM session_state")
            .fetch_all(&pool)
            .await
            .context("failed to read session state")?;

        let mut record = PersistedSession::default();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            match key.as_str() {
                TOKEN_KEY => record.token = Some(value),
                REFRESH_TOKEN_KEY => record.refresh_token = Some(value),
                USER_KEY => record.user = Some(value),
                _ => {}
            }
        }
        Ok(record)
    }

    async fn save(&self, record: &PersistedSession) -> anyhow::Result<()> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        // One transaction per triple: a reload observes either the previous
        // committed triple or the new one, never a mix.
        let mut tx = pool.begin().await.context("failed to begin session write")?;

        sqlx::query("DELETE FROM session_state")
            .execute(&mut *tx)
            .await
            .context("failed to clear previous session state")?;

        let entries = [
            (TOKEN_KEY, record.token.as_ref()),
            (REFRESH_TOKEN_KEY, record.refresh_token.as_ref()),
            (USER_KEY, record.user.as_ref()),
        ];
        for (key, value) in entries {
            let Some(value) = value else { continue };
            sqlx::query("INSERT INTO session_state (key, value, updated_at) VALUES (?1, ?2, ?3)")
                .bind(key)
                .bind(value)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to write session key '{key}'"))?;
        }

        tx.commit().await.context("failed to commit session write")?;
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let pool = self.pool().await?;
        sqlx::query("DELETE FROM session_state")
            .execute(&pool)
            .await
            .context("failed to clear session state")?;
        Ok(())
    }
}

/// In-memory storage: ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<PersistedSession>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> anyhow::Result<PersistedSession> {
        Ok(self.record.lock().await.clone())
    }

    async fn save(&self, record: &PersistedSession) -> anyhow::Result<()> {
        *self.record.lock().await = record.clone();
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.record.lock().await = PersistedSession::default();
        Ok(())
    }
}

/// Resolve the default database path: `{app_data_dir}/washdesk/session.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut home| {
                home.push(".local");
                home.push("share");
                home
            })
        })
        .context("failed to resolve OS app data directory")?;

    let mut dir = base;
    dir.push("washdesk");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory at {:?}", dir))?;

    dir.push("session.db");
    Ok(dir)
}
