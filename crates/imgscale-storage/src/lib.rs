//! Imgscale Storage Library
//!
//! This crate provides the storage abstraction used by the derivative
//! pipeline and its backend implementations for S3 and the local filesystem.
//!
//! Backends store opaque object keys. Keys must not contain `..` or a leading
//! `/`; key construction itself (prefixing, extension handling) lives in
//! `imgscale-core` so every consumer builds keys the same way.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgscale_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::{LocalStorage, ObjectMetadata};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
