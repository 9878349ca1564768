//! # dashdeck-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Keep string settings in a single `settings` key/value table
//! - Implement the [`LayoutStore`](dashdeck_app::ports::LayoutStore) port on
//!   top of the `dashboardLayout` key
//! - Create the table on connect (sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `dashdeck-app` (for port traits) and `dashdeck-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod settings_repo;

pub use error::StorageError;
pub use settings_repo::SqliteSettingsRepository;
