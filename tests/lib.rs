//! Fixtures shared by the store integration tests.

use platform_db::{DatabaseSettings, DbResult, SeaStore, migrate_up};
use sea_orm::DatabaseConnection;

/// Single-connection in-memory SQLite with every migration applied.
pub async fn memory_db() -> DbResult<DatabaseConnection> {
    let db = DatabaseSettings::with_url("sqlite::memory:")
        .max_connections(1)
        .connect()
        .await?;
    migrate_up(&db).await?;
    Ok(db)
}

pub async fn memory_store() -> DbResult<SeaStore> {
    Ok(SeaStore::new(memory_db().await?))
}
