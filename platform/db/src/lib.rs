//! Database wiring and the sea-orm implementations of the product store
//! traits.

mod calendar;
mod directory;
pub mod objects;
pub mod seed;

use migration::{Migrator, MigratorTrait};
use platform_store::StoreError;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub use objects::LocalObjectStore;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            ..Self::default()
        }
    }

    /// Settings pinned to an explicit url; the environment is not consulted.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn database_url(&self) -> DbResult<String> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => {
                std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone()))
            }
        }
    }

    pub async fn connect(&self) -> DbResult<DatabaseConnection> {
        let url = self.database_url()?;
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(self.max_connections)
            .sqlx_logging(false);
        let db = Database::connect(options).await?;
        info!(backend = ?db.get_database_backend(), "database connected");
        Ok(db)
    }
}

pub async fn migrate_up(db: &DatabaseConnection) -> DbResult<()> {
    Migrator::up(db, None).await?;
    Ok(())
}

/// Roll back `steps` migrations, or all of them when `None`.
pub async fn migrate_down(db: &DatabaseConnection, steps: Option<u32>) -> DbResult<()> {
    Migrator::down(db, steps).await?;
    Ok(())
}

pub async fn pending_migrations(db: &DatabaseConnection) -> DbResult<usize> {
    Ok(Migrator::get_pending_migrations(db).await?.len())
}

/// Record store over one shared connection pool; implements both
/// `DirectoryStore` and `EventStore`.
#[derive(Clone, Debug)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub(crate) fn db_error(err: DbErr) -> StoreError {
    if matches!(err, DbErr::RecordNotFound(_)) {
        return StoreError::NotFound;
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::InvalidInput("a record with the same unique value already exists".into())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            StoreError::InvalidInput("a referenced record does not exist".into())
        }
        _ => {
            tracing::error!(error = %err, "database error");
            StoreError::backend(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_environment() {
        let settings = DatabaseSettings::with_url("sqlite::memory:");
        assert_eq!(settings.database_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn missing_variable_names_the_key() {
        let settings = DatabaseSettings::new("HUB_TEST_DATABASE_URL_THAT_IS_NEVER_SET");
        let err = settings.database_url().unwrap_err();
        assert_eq!(
            err.to_string(),
            "database url missing (set HUB_TEST_DATABASE_URL_THAT_IS_NEVER_SET)"
        );
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = db_error(DbErr::RecordNotFound("teammates".into()));
        assert!(err.is_not_found());
    }
}
