//! File storage backends.
//!
//! Provides the trait and local-filesystem implementation for storing
//! uploaded photos.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// File storage backend trait.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write data to storage under the given filename.
    async fn write(&self, filename: &str, data: &[u8]) -> Result<()>;

    /// Delete a file from storage.
    async fn delete(&self, filename: &str) -> Result<()>;

    /// Get the public URL for a file.
    fn public_url(&self, filename: &str) -> String;
}

/// Local filesystem storage.
pub struct LocalFileStorage {
    /// Base path for file storage.
    base_path: PathBuf,
    /// Base URL for public file access.
    base_url: String,
}

impl LocalFileStorage {
    /// Create a new local file storage.
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a stored filename to an on-disk path.
    ///
    /// Rejects separators and `..` components to prevent directory
    /// traversal.
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
            anyhow::bail!("invalid storage filename");
        }
        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn write(&self, filename: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(filename)?;

        // Create the uploads directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("failed to create upload directories")?;
        }

        let mut file = fs::File::create(&path)
            .await
            .context("failed to create file")?;

        file.write_all(data).await.context("failed to write file")?;

        file.flush().await.context("failed to flush file")?;

        debug!(filename = %filename, path = ?path, size = data.len(), "file written");
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;

        if path.exists() {
            fs::remove_file(&path)
                .await
                .context("failed to delete file")?;
            debug!(filename = %filename, "file deleted");
        } else {
            warn!(filename = %filename, "file not found for deletion");
        }

        Ok(())
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }
}

impl std::fmt::Debug for LocalFileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFileStorage")
            .field("base_path", &self.base_path)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_traversal() {
        let storage = LocalFileStorage::new("/tmp/uploads", "/uploads");

        assert!(storage.resolve("../etc/passwd").is_err());
        assert!(storage.resolve("a/b.jpg").is_err());
        assert!(storage.resolve("a\\b.jpg").is_err());
        assert!(storage.resolve("").is_err());
        assert!(storage.resolve("Photo_x.jpg").is_ok());
    }

    #[test]
    fn public_url_joins_base() {
        let storage = LocalFileStorage::new("/tmp/uploads", "https://example.com/uploads/");
        assert_eq!(
            storage.public_url("Photo_x.jpg"),
            "https://example.com/uploads/Photo_x.jpg"
        );
    }
}
