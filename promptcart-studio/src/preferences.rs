//! User preferences
//!
//! Flat key-value preferences (credential, endpoint, theme, language) behind a
//! [`PreferenceStore`] capability. [`Preferences`] caches the values and
//! writes every change through to the store immediately.

use crate::language::{DisplayLanguage, Theme};
use async_trait::async_trait;
use promptcart_common::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Default optimizer endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Preference keys and their storage names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Credential,
    Endpoint,
    Theme,
    Language,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Credential => "gemini_api_key",
            PreferenceKey::Endpoint => "gemini_base_url",
            PreferenceKey::Theme => "app_theme",
            PreferenceKey::Language => "app_language",
        }
    }
}

/// Durable key-value storage
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>>;
    async fn set(&self, key: PreferenceKey, value: &str) -> Result<()>;
}

// ============================================================================
// SQLite store
// ============================================================================

/// Preferences persisted in the `settings` table
#[derive(Clone)]
pub struct SqlitePreferenceStore {
    db: SqlitePool,
}

impl SqlitePreferenceStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Open (or create) the preferences database file
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // mode=rwc: read, write, create
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        debug!("Connecting to database: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        create_settings_table(&pool).await?;

        Ok(Self::new(pool))
    }

    /// Single-connection in-memory database
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        create_settings_table(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

/// Create the settings table if it doesn't exist
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.db)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.db)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Non-durable store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<PreferenceKey, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with values
    pub fn with_values(values: impl IntoIterator<Item = (PreferenceKey, String)>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PreferenceKey, String>>> {
        self.values
            .lock()
            .map_err(|_| Error::Internal("preference store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }
}

// ============================================================================
// Preferences context
// ============================================================================

/// Cached, write-through preferences
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
    credential: String,
    endpoint: String,
    theme: Theme,
    language: DisplayLanguage,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("has_credential", &self.has_credential())
            .field("endpoint", &self.endpoint)
            .field("theme", &self.theme)
            .field("language", &self.language)
            .finish()
    }
}

impl Preferences {
    /// Read every preference once, applying defaults for missing values
    pub async fn load(store: Arc<dyn PreferenceStore>) -> Result<Self> {
        let credential = store.get(PreferenceKey::Credential).await?.unwrap_or_default();
        let endpoint = store
            .get(PreferenceKey::Endpoint)
            .await?
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let theme = match store.get(PreferenceKey::Theme).await? {
            Some(value) => Theme::parse(&value).unwrap_or_else(|| {
                warn!("Invalid app_theme '{}', using default", value);
                Theme::default()
            }),
            None => Theme::default(),
        };

        let language = match store.get(PreferenceKey::Language).await? {
            Some(value) => DisplayLanguage::from_code(&value).unwrap_or_else(|| {
                warn!("Invalid app_language '{}', using default", value);
                DisplayLanguage::default()
            }),
            None => DisplayLanguage::default(),
        };

        debug!(
            has_credential = !credential.trim().is_empty(),
            endpoint = %endpoint,
            theme = theme.as_str(),
            language = language.code(),
            "Preferences loaded"
        );

        Ok(Self {
            store,
            credential,
            endpoint,
            theme,
            language,
        })
    }

    /// Configured credential; empty and whitespace-only values count as absent.
    /// A non-blank value is returned exactly as stored.
    pub fn credential(&self) -> Option<&str> {
        if self.credential.trim().is_empty() {
            None
        } else {
            Some(&self.credential)
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// Endpoint as stored (may be blank)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint used for requests; a blank value falls back to the default
    pub fn effective_endpoint(&self) -> &str {
        if self.endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT
        } else {
            &self.endpoint
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> DisplayLanguage {
        self.language
    }

    pub async fn set_credential(&mut self, value: &str) -> Result<()> {
        self.store.set(PreferenceKey::Credential, value).await?;
        self.credential = value.to_string();
        Ok(())
    }

    pub async fn set_endpoint(&mut self, value: &str) -> Result<()> {
        self.store.set(PreferenceKey::Endpoint, value).await?;
        self.endpoint = value.to_string();
        Ok(())
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(PreferenceKey::Theme, theme.as_str()).await?;
        self.theme = theme;
        Ok(())
    }

    pub async fn set_language(&mut self, language: DisplayLanguage) -> Result<()> {
        self.store.set(PreferenceKey::Language, language.code()).await?;
        self.language = language;
        Ok(())
    }
}
