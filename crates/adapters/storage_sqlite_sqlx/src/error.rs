//! Errors of the settings store, each carrying what was being accessed.

use dashdeck_domain::error::DashError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cannot open settings database {url:?}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("cannot migrate settings database")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("cannot access setting {key:?}")]
    Query {
        key: String,
        #[source]
        source: sqlx::Error,
    },
}

impl StorageError {
    pub(crate) fn connect(url: &str) -> impl FnOnce(sqlx::Error) -> Self + '_ {
        move |source| Self::Connect {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn query(key: &str) -> impl FnOnce(sqlx::Error) -> Self + '_ {
        move |source| Self::Query {
            key: key.to_string(),
            source,
        }
    }
}

impl From<StorageError> for DashError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
