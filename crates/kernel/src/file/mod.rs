//! File and media management.
//!
//! Photo upload validation and storage.

pub mod service;
pub mod storage;

pub use service::{FileService, StoredPhoto, UploadError};
pub use storage::{FileStorage, LocalFileStorage};
