//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The pipeline works against this trait so source probing and derivative
/// writes stay independent of any one provider.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Download an object by key.
    ///
    /// A missing object is reported as `StorageError::NotFound`; every other
    /// failure maps to a transport or backend error.
    async fn download(&self, key: &str) -> StorageResult<Bytes>;

    /// Upload data to a key with a content type and object tags.
    ///
    /// The content type and tags are stored alongside the object so that
    /// lifecycle rules keyed on tags (for example expiring transient
    /// derivatives) see them immediately.
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        tags: &[(&str, &str)],
    ) -> StorageResult<()>;

    /// Check whether an object exists without downloading it.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
