//! Persisted display preferences (the light/dark theme flag).

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage key of the theme flag; values are `"true"` / `"false"`.
pub const THEME_KEY: &str = "dark-mode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than the literal `"true"` reads as light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("true") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_stored(&self) -> &'static str {
        match self {
            Theme::Dark => "true",
            Theme::Light => "false",
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to the page body.
    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            Theme::Dark => Some("dark-mode"),
            Theme::Light => None,
        }
    }

    /// Icon shown on the toggle: the sun switches back to light.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "fa-sun",
            Theme::Light => "fa-moon",
        }
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for PreferenceError {
    fn from(err: sqlx::Error) -> Self {
        PreferenceError::Storage(err.to_string())
    }
}

/// Key/value storage scoped to one user.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Volatile backend for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceBackend for MemoryPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed backend; survives restarts.
#[derive(Debug, Clone)]
pub struct SqlitePreferences {
    pool: SqlitePool,
}

impl SqlitePreferences {
    /// Open (creating if needed) the database at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create preferences directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open preferences database at {:?}", path))?;

        Self::with_pool(pool).await
    }

    /// A private in-memory database (single connection so it is shared).
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory SQLite options")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("failed to open in-memory preferences database")?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create preferences table")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PreferenceBackend for SqlitePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// The theme flag plus the backend it persists to.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
    theme: Theme,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self {
            backend,
            theme: Theme::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPreferences::new()))
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Read the persisted flag. Storage errors fall back to light.
    pub async fn load(&mut self) -> Theme {
        self.theme = match self.backend.get(THEME_KEY).await {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme preference; using light");
                Theme::Light
            }
        };
        self.theme
    }

    /// Flip and persist. The in-memory flag flips even if persisting fails.
    pub async fn toggle(&mut self) -> Result<Theme, PreferenceError> {
        self.theme = self.theme.toggled();
        self.backend.set(THEME_KEY, self.theme.as_stored()).await?;
        Ok(self.theme)
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}
