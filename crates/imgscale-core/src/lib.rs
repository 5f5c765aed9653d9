//! Imgscale Core Library
//!
//! Shared domain types for the imgscale derivative service: configuration,
//! pipeline errors, transform path parsing, the resolution allow-list, and
//! source key construction.

pub mod config;
pub mod error;
pub mod keys;
pub mod path;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{LogLevel, PipelineError, PipelineResult};
pub use keys::{apply_prefix, SourceKey};
pub use path::{Resolution, TransformRequest};
pub use policy::ResolutionPolicy;
pub use storage_types::StorageBackend;
