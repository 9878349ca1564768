//! `SQLite` key/value settings, and the [`LayoutStore`] built on them.

use std::future::Future;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use dashdeck_app::ports::LayoutStore;
use dashdeck_domain::error::DashError;
use dashdeck_domain::layout::{LAYOUT_STORAGE_KEY, Layout};

use crate::error::StorageError;

const SELECT_BY_KEY: &str = "SELECT value FROM settings WHERE key = ?";
const UPSERT: &str = "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_BY_KEY: &str = "DELETE FROM settings WHERE key = ?";

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool size for file databases. An in-memory database lives in a single
/// connection, so it gets exactly one.
const MAX_CONNECTIONS: u32 = 4;

/// `SQLite`-backed settings repository.
#[derive(Clone)]
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    /// Open `database_url`, creating the file if needed, and bring the
    /// `settings` table up to date.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database cannot be opened or migrated.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::connect(database_url))?
            .create_if_missing(true);
        let max_connections = if is_in_memory(database_url) {
            1
        } else {
            MAX_CONNECTIONS
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(StorageError::connect(database_url))?;

        MIGRATOR.run(&pool).await?;

        tracing::info!(url = database_url, "settings store ready");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT_BY_KEY)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::query(key))?;
        Ok(row.map(|(value,)| value))
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::query(key))?;
        Ok(())
    }

    /// Remove `key`. Returns whether a value was stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    pub async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(DELETE_BY_KEY)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::query(key))?;
        Ok(result.rows_affected() > 0)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl LayoutStore for SqliteSettingsRepository {
    fn load(&self) -> impl Future<Output = Result<Option<Layout>, DashError>> + Send {
        let repo = self.clone();
        async move {
            let Some(value) = repo.get(LAYOUT_STORAGE_KEY).await? else {
                return Ok(None);
            };
            match value.parse::<Layout>() {
                Ok(layout) => Ok(Some(layout)),
                Err(err) => {
                    tracing::warn!(value = %value, error = %err, "ignoring stored layout");
                    Ok(None)
                }
            }
        }
    }

    fn save(&self, layout: Layout) -> impl Future<Output = Result<(), DashError>> + Send {
        let repo = self.clone();
        async move {
            repo.set(LAYOUT_STORAGE_KEY, layout.as_str()).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> SqliteSettingsRepository {
        SqliteSettingsRepository::connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_only_the_settings_table_on_connect() {
        let repo = setup().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(repo.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["settings"]);
    }

    #[tokio::test]
    async fn should_report_url_when_database_cannot_be_opened() {
        let url = "sqlite:/nonexistent-dashdeck-dir/settings.db";
        let Err(err) = SqliteSettingsRepository::connect(url).await else {
            panic!("expected a connect error");
        };
        assert!(matches!(err, StorageError::Connect { ref url, .. } if url.contains("nonexistent")));
    }

    #[tokio::test]
    async fn should_name_the_key_when_a_query_fails() {
        let repo = setup().await;
        repo.pool().close().await;

        let err = repo.get("theme").await.unwrap_err();
        assert!(matches!(err, StorageError::Query { ref key, .. } if key == "theme"));
        assert_eq!(err.to_string(), "cannot access setting \"theme\"");
    }

    #[test]
    fn should_detect_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:dashdeck.db?mode=rwc"));
    }

    #[tokio::test]
    async fn should_return_none_when_key_not_found() {
        let repo = setup().await;
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_overwrite_value_when_key_exists() {
        let repo = setup().await;

        repo.set("theme", "dark").await.unwrap();
        repo.set("theme", "light").await.unwrap();

        assert_eq!(repo.get("theme").await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn should_remove_value() {
        let repo = setup().await;
        repo.set("theme", "dark").await.unwrap();

        assert!(repo.remove("theme").await.unwrap());
        assert!(!repo.remove("theme").await.unwrap());
        assert!(repo.get("theme").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_persist_layout_under_dashboard_layout_key() {
        let repo = setup().await;

        repo.save(Layout::List).await.unwrap();

        assert_eq!(
            repo.get("dashboardLayout").await.unwrap().as_deref(),
            Some("list")
        );
        assert_eq!(repo.load().await.unwrap(), Some(Layout::List));
    }

    #[tokio::test]
    async fn should_load_nothing_when_layout_never_saved() {
        let repo = setup().await;
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_ignore_unknown_stored_layout() {
        let repo = setup().await;
        repo.set(LAYOUT_STORAGE_KEY, "carousel").await.unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
    }
}
