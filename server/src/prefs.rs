//! Viewer preferences persisted to a small JSON file.
//!
//! The role stored here is a display preference only. Nothing on the server
//! consults it before serving or mutating data.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_graphql::{Enum, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    User,
    Manager,
    #[default]
    Admin,
    Executive,
}

#[derive(SimpleObject, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub expanded_items: Vec<String>,
    pub role: ViewerRole,
}

impl Preferences {
    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    /// Collapsing the sidebar also closes every expanded section.
    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
        if collapsed {
            self.expanded_items.clear();
        }
    }

    pub fn toggle_expanded(&mut self, item: &str) {
        if let Some(pos) = self.expanded_items.iter().position(|id| id == item) {
            self.expanded_items.remove(pos);
        } else {
            self.expanded_items.push(item.to_string());
        }
    }

    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(items) = patch.expanded_items {
            self.expanded_items = items;
        }
        if let Some(collapsed) = patch.sidebar_collapsed {
            self.set_sidebar_collapsed(collapsed);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub sidebar_collapsed: Option<bool>,
    pub expanded_items: Option<Vec<String>>,
    pub role: Option<ViewerRole>,
}

/// File-backed preference store. Reads are served from memory; every update
/// rewrites the file.
#[derive(Debug)]
pub struct PrefsStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PrefsStore {
    /// Load `path`, falling back to defaults when it is missing or unreadable.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "preferences file unreadable; using defaults");
                Preferences::default()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Preferences::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Preferences {
        self.current.read().await.clone()
    }

    pub async fn update(&self, patch: PreferencesPatch) -> Result<Preferences> {
        let mut guard = self.current.write().await;
        let mut next = guard.clone();
        next.apply(patch);
        self.persist(&next).await?;
        *guard = next.clone();
        info!(theme = ?next.theme, role = ?next.role, "preferences saved");
        Ok(next)
    }

    async fn persist(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = serde_json::to_vec_pretty(prefs).context("encoding preferences")?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("hub-prefs-{}", Uuid::new_v4()))
            .join("prefs.json")
    }

    #[test]
    fn defaults_match_a_fresh_session() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, Theme::Light);
        assert!(!prefs.sidebar_collapsed);
        assert!(prefs.expanded_items.is_empty());
        assert_eq!(prefs.role, ViewerRole::Admin);
    }

    #[test]
    fn collapsing_clears_expanded_items() {
        let mut prefs = Preferences::default();
        prefs.toggle_expanded("team");
        prefs.toggle_expanded("tools");
        prefs.toggle_expanded("team");
        assert_eq!(prefs.expanded_items, vec!["tools".to_string()]);

        prefs.set_sidebar_collapsed(true);
        assert!(prefs.expanded_items.is_empty());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.role, ViewerRole::Admin);
    }

    #[tokio::test]
    async fn updates_survive_reopen() {
        let path = scratch_path();
        let store = PrefsStore::open(&path).await.unwrap();
        assert_eq!(store.get().await, Preferences::default());

        let saved = store
            .update(PreferencesPatch {
                theme: Some(Theme::Dark),
                role: Some(ViewerRole::Manager),
                ..PreferencesPatch::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.theme, Theme::Dark);

        let reopened = PrefsStore::open(&path).await.unwrap();
        assert_eq!(reopened.get().await, saved);

        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_defaults() {
        let path = scratch_path();
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.unwrap();
        }
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let store = PrefsStore::open(&path).await.unwrap();
        assert_eq!(store.get().await, Preferences::default());
        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}
