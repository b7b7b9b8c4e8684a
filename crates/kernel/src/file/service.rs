//! Photo upload service.
//!
//! Validates uploads (size bound, image content sniffing) and stores
//! them under a generated name. Validation happens before any storage
//! write, so a rejected upload leaves no trace.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::storage::FileStorage;

/// Image extensions accepted for photo uploads.
const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "webp"];

/// Photo upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("file is not a supported image")]
    NotAnImage,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A stored photo.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredPhoto {
    pub filename: String,
    pub url: String,
    pub size: usize,
    pub mime_type: String,
}

/// File service for photo uploads.
pub struct FileService {
    storage: Arc<dyn FileStorage>,
    max_size: usize,
}

impl FileService {
    /// Create a new file service.
    pub fn new(storage: Arc<dyn FileStorage>, max_size: usize) -> Self {
        Self { storage, max_size }
    }

    /// Validate and store a bootcamp photo.
    ///
    /// The stored name is `Photo_<id>.<ext>` with the extension taken
    /// from the sniffed content type, never from the client filename.
    pub async fn store_photo(&self, id: Uuid, data: &[u8]) -> Result<StoredPhoto, UploadError> {
        if data.len() > self.max_size {
            return Err(UploadError::TooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        // The client mimetype is advisory; trust the bytes.
        let kind = infer::get(data).ok_or(UploadError::NotAnImage)?;
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&kind.extension()) {
            return Err(UploadError::NotAnImage);
        }

        let filename = format!("Photo_{id}.{}", kind.extension());

        self.storage.write(&filename, data).await?;

        tracing::info!(
            filename = %filename,
            size = data.len(),
            mime = kind.mime_type(),
            "photo stored"
        );

        Ok(StoredPhoto {
            url: self.storage.public_url(&filename),
            filename,
            size: data.len(),
            mime_type: kind.mime_type().to_string(),
        })
    }

    /// Remove a previously stored photo.
    pub async fn remove(&self, filename: &str) -> anyhow::Result<()> {
        self.storage.delete(filename).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory storage that records writes.
    #[derive(Default)]
    struct RecordingStorage {
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileStorage for RecordingStorage {
        async fn write(&self, filename: &str, _data: &[u8]) -> Result<()> {
            self.writes.lock().unwrap().push(filename.to_string());
            Ok(())
        }

        async fn delete(&self, _filename: &str) -> Result<()> {
            Ok(())
        }

        fn public_url(&self, filename: &str) -> String {
            format!("/uploads/{filename}")
        }
    }

    /// Minimal valid PNG header bytes for content sniffing.
    const PNG_HEADER: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    #[tokio::test]
    async fn stores_sniffed_image_under_generated_name() {
        let storage = Arc::new(RecordingStorage::default());
        let service = FileService::new(storage.clone(), 1_000_000);
        let id = Uuid::now_v7();

        let photo = service.store_photo(id, PNG_HEADER).await.unwrap();

        assert_eq!(photo.filename, format!("Photo_{id}.png"));
        assert_eq!(photo.mime_type, "image/png");
        assert_eq!(photo.url, format!("/uploads/Photo_{id}.png"));
        assert_eq!(storage.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_non_image_before_any_write() {
        let storage = Arc::new(RecordingStorage::default());
        let service = FileService::new(storage.clone(), 1_000_000);

        let result = service.store_photo(Uuid::now_v7(), b"plain text payload").await;

        assert!(matches!(result, Err(UploadError::NotAnImage)));
        assert!(storage.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_oversized_payload_before_sniffing() {
        let storage = Arc::new(RecordingStorage::default());
        let service = FileService::new(storage.clone(), 8);

        let result = service.store_photo(Uuid::now_v7(), PNG_HEADER).await;

        assert!(matches!(
            result,
            Err(UploadError::TooLarge { size: 12, max: 8 })
        ));
        assert!(storage.writes.lock().unwrap().is_empty());
    }
}
