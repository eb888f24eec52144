use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use platform_store::{
    HEADSHOT_BUCKET, ObjectStore, StoreError, StoreResult, headshot_object_path,
    object_path_from_url,
};
use rand::{Rng, distributions::Alphanumeric};
use tracing::{debug, info};
use uuid::Uuid;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Filesystem-backed object store. Objects live under
/// `<root>/teammate-headshots/` and are addressed publicly as
/// `<public_base>/teammate-headshots/<key>`.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{HEADSHOT_BUCKET}/{key}", self.public_base)
    }

    fn object_file(&self, key: &str) -> PathBuf {
        self.root.join(HEADSHOT_BUCKET).join(key)
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase()
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        owner: Option<Uuid>,
    ) -> StoreResult<String> {
        if bytes.is_empty() {
            return Err(StoreError::InvalidInput("Uploaded file is empty".into()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(StoreError::InvalidInput(format!(
                "Uploaded file exceeds {MAX_UPLOAD_BYTES} bytes"
            )));
        }
        let key = headshot_object_path(
            file_name,
            owner,
            Utc::now().timestamp_millis(),
            &random_suffix(),
        );
        let path = self.object_file(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::backend)?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(StoreError::backend)?;
        info!(%key, bytes = bytes.len(), "headshot stored");
        Ok(self.public_url(&key))
    }

    async fn delete(&self, public_url: &str) -> StoreResult<()> {
        let prefix = format!("{}/", self.public_base);
        if !public_url.starts_with(&prefix) {
            return Err(StoreError::InvalidInput("Invalid headshot URL".into()));
        }
        let key = object_path_from_url(public_url)?;
        match tokio::fs::remove_file(self.object_file(key)).await {
            Ok(()) => {
                info!(%key, "headshot removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(%key, "headshot already gone");
                Ok(())
            }
            Err(err) => Err(StoreError::backend(err)),
        }
    }
}
