//! Uploaded media
//!
//! The only contract is "durably write these bytes, return a retrievable URL".

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::core::{Error, Result};

/// Content types accepted for upload
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

const MAX_NAME_LEN: usize = 100;

/// Destination for uploaded files
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist a file in one shot and return the URL it is served under
    async fn save(&self, file_name: &str, content_type: &str, data: Bytes) -> Result<String>;
}

/// Reject anything that is not an allowed image or is over the size cap
pub fn check_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(Error::invalid_input(
            "Invalid file type. Only images are allowed.",
        ));
    }
    if size > max_bytes {
        return Err(Error::invalid_input(format!(
            "File size exceeds the {}MB limit.",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Reduce a client-supplied file name to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let mut safe: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    if safe.is_empty() {
        safe.push_str("file");
    }
    safe
}

/// Writes uploads into a local directory served as static files
pub struct LocalMediaStore {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, file_name: &str, content_type: &str, data: Bytes) -> Result<String> {
        fs::create_dir_all(&self.dir).await?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name));
        fs::write(self.dir.join(&stored_name), &data).await?;

        info!(file = %stored_name, content_type, size = data.len(), "media stored");
        Ok(format!("{}/{}", self.url_prefix, stored_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_checks() {
        let cap = 5 * 1024 * 1024;
        assert!(check_upload("image/png", 10, cap).is_ok());
        assert!(check_upload("image/svg+xml", cap, cap).is_ok());

        let err = check_upload("application/pdf", 10, cap).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid file type. Only images are allowed.");

        let err = check_upload("image/jpeg", cap + 1, cap).unwrap_err();
        assert!(err.to_string().contains("exceeds the 5MB limit"));
    }

    #[test]
    fn test_file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\x\\my pic.png"), "my-pic.png");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path().join("uploads"), "/uploads/");

        let url = store
            .save("logo.png", "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-logo.png"));

        let stored = url.trim_start_matches("/uploads/");
        let bytes = std::fs::read(store.dir().join(stored)).unwrap();
        assert_eq!(bytes, b"\x89PNG");
    }
}
