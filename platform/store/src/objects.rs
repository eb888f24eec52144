use async_trait::async_trait;
use uuid::Uuid;

use crate::{StoreError, StoreResult};

/// Bucket holding teammate profile images.
pub const HEADSHOT_BUCKET: &str = "teammate-headshots";

/// Blob storage for profile images. Only public URLs cross this seam.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str, owner: Option<Uuid>)
    -> StoreResult<String>;

    async fn delete(&self, public_url: &str) -> StoreResult<()>;
}

/// Object key for an uploaded headshot: `<owner>/<millis>.<ext>` when the
/// teammate is known, `<millis>-<suffix>.<ext>` otherwise. Extensions that
/// are not plain ASCII alphanumerics become `bin`.
pub fn headshot_object_path(file_name: &str, owner: Option<Uuid>, millis: i64, suffix: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
        .to_ascii_lowercase();
    match owner {
        Some(id) => format!("{id}/{millis}.{ext}"),
        None => format!("{millis}-{suffix}.{ext}"),
    }
}

/// Extract the object key from a public headshot URL.
pub fn object_path_from_url(public_url: &str) -> StoreResult<&str> {
    let marker = format!("{HEADSHOT_BUCKET}/");
    let invalid = || StoreError::InvalidInput("Invalid headshot URL".into());
    let (_, path) = public_url.split_once(marker.as_str()).ok_or_else(invalid)?;
    if path.is_empty() || path.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(invalid());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_uploads_are_grouped_by_teammate() {
        let owner = Uuid::nil();
        let path = headshot_object_path("Portrait.JPG", Some(owner), 1_767_225_600_000, "x");
        assert_eq!(path, format!("{owner}/1767225600000.jpg"));
    }

    #[test]
    fn anonymous_uploads_carry_a_suffix() {
        let path = headshot_object_path("face.png", None, 42, "k3j2");
        assert_eq!(path, "42-k3j2.png");
    }

    #[test]
    fn unsafe_extensions_fall_back_to_bin() {
        let owner = Uuid::nil();
        assert_eq!(
            headshot_object_path("x./a/b", Some(owner), 7, "s"),
            format!("{owner}/7.bin")
        );
        assert_eq!(headshot_object_path("face.p%g", None, 7, "s"), "7-s.bin");
        assert_eq!(headshot_object_path("noext", None, 7, "s"), "7-s.bin");
        assert_eq!(headshot_object_path("trailing.", None, 7, "s"), "7-s.bin");
    }

    #[test]
    fn url_outside_bucket_is_rejected() {
        let err = object_path_from_url("https://cdn.test/other/a.png").unwrap_err();
        assert_eq!(err, StoreError::InvalidInput("Invalid headshot URL".into()));
        assert!(object_path_from_url("https://cdn.test/teammate-headshots/../etc").is_err());
    }

    #[test]
    fn url_inside_bucket_yields_key() {
        let key = object_path_from_url("http://localhost/files/teammate-headshots/a/1.png").unwrap();
        assert_eq!(key, "a/1.png");
    }
}
