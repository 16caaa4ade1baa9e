//! Object storage for item photos
//!
//! One object per uploaded photo, namespaced by user id with a random
//! suffix. [`LocalObjectStore`] keeps objects on disk under the root
//! folder and hands out URLs served by this process under `/media`.

use async_trait::async_trait;
use rand::Rng;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use wardrobe_common::{Error, Result};

/// URL prefix the router serves local objects from
pub const MEDIA_ROUTE: &str = "/media";

/// Object storage contract
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<()>;

    /// Remove the object at `path`
    async fn delete(&self, path: &str) -> Result<()>;

    /// URL a browser can load the object from
    fn public_url(&self, path: &str) -> String;
}

/// Filesystem-backed store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || path.is_empty() {
            return Err(Error::Storage(format!("Invalid object path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!("Stored {} ({} bytes, {})", path, bytes.len(), content_type);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        tokio::fs::remove_file(&target).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Extension from the client's file name, `jpg` when absent or odd
fn extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext))
            if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => "jpg".to_string(),
    }
}

/// `{user_id}/{unix_millis}-{suffix}.{ext}`
pub fn object_path(user_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        user_id,
        chrono::Utc::now().timestamp_millis(),
        random_suffix(11),
        extension(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_object_path_namespaced_by_user() {
        let path = object_path("user-1", "IMG_0042.PNG");
        let (user, file) = path.split_once('/').unwrap();
        assert_eq!(user, "user-1");
        assert!(file.ends_with(".png"));

        let stem = file.trim_end_matches(".png");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 11);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_object_paths_are_unique() {
        assert_ne!(object_path("u", "a.jpg"), object_path("u", "a.jpg"));
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension("photo"), "jpg");
        assert_eq!(extension("photo."), "jpg");
        assert_eq!(extension("weird.ext/../x"), "jpg");
        assert_eq!(extension("shirt.webp"), "webp");
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path().to_path_buf(), "http://localhost/media/");

        store.upload("u1/a.jpg", b"jpeg", "image/jpeg").await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("u1/a.jpg")).unwrap(), b"jpeg");
        assert_eq!(store.public_url("u1/a.jpg"), "http://localhost/media/u1/a.jpg");

        store.delete("u1/a.jpg").await.unwrap();
        assert!(!dir.path().join("u1/a.jpg").exists());
    }

    #[tokio::test]
    async fn test_local_store_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path().to_path_buf(), "/media");

        assert!(store.upload("../evil.jpg", b"x", "image/jpeg").await.is_err());
        assert!(store.upload("/etc/evil.jpg", b"x", "image/jpeg").await.is_err());
    }
}
