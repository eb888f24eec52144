use std::path::PathBuf;

use anyhow::{Result, bail};
use products_directory::DEFAULT_EXPORT_SLUG;

pub const DEFAULT_STORAGE_DIR: &str = "./storage";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/files";
pub const DEFAULT_PREFS_PATH: &str = "./hub-prefs.json";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: Option<String>,
    /// Directory holding uploaded headshots, served under `/files`.
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub prefs_path: PathBuf,
    pub export_slug: String,
    pub cors_allowed_origins: Vec<String>,
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Read the process environment, after loading `.env` when present.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let public_base_url = var("HUB_PUBLIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();
        if !public_base_url.starts_with("http://") && !public_base_url.starts_with("https://") {
            bail!("HUB_PUBLIC_BASE_URL must be an absolute http(s) url, got `{public_base_url}`");
        }

        let export_slug = var("HUB_EXPORT_SLUG").unwrap_or_else(|| DEFAULT_EXPORT_SLUG.into());
        if export_slug.contains(['/', '\\', '"']) {
            bail!("HUB_EXPORT_SLUG must not contain path separators or quotes");
        }

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url: var("DATABASE_URL"),
            storage_dir: var("HUB_STORAGE_DIR")
                .unwrap_or_else(|| DEFAULT_STORAGE_DIR.into())
                .into(),
            public_base_url,
            prefs_path: var("HUB_PREFS_PATH")
                .unwrap_or_else(|| DEFAULT_PREFS_PATH.into())
                .into(),
            export_slug,
            cors_allowed_origins,
            otlp_endpoint: var("OTLP_ENDPOINT"),
        })
    }
}
