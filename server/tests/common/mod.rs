use std::{path::PathBuf, sync::Arc};

use hub_server::{AppConfig, AppState};
use platform_db::{DatabaseSettings, migrate_up};
use uuid::Uuid;

pub struct TestApp {
    pub state: AppState,
    pub scratch: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.scratch);
    }
}

/// Fresh in-memory database with the schema applied, plus scratch
/// directories for uploads and preferences.
pub async fn spawn() -> TestApp {
    let db = DatabaseSettings::with_url("sqlite::memory:")
        .max_connections(1)
        .connect()
        .await
        .expect("connect sqlite");
    migrate_up(&db).await.expect("migrate");

    let scratch = std::env::temp_dir().join(format!("hub-server-{}", Uuid::new_v4()));
    let files = scratch.join("files").display().to_string();
    let prefs = scratch.join("prefs.json").display().to_string();
    let config = AppConfig::from_lookup(|key| match key {
        "HUB_STORAGE_DIR" => Some(files.clone()),
        "HUB_PREFS_PATH" => Some(prefs.clone()),
        "HUB_PUBLIC_BASE_URL" => Some("http://hub.test/files".into()),
        "HUB_EXPORT_SLUG" => Some("team".into()),
        _ => None,
    })
    .expect("config");
    let state = AppState::new(Arc::new(config), db).await.expect("state");
    TestApp { state, scratch }
}
