//! Source object resolution.
//!
//! The key a client asks for may not exist in that format even though a
//! sibling rendition does. Resolution probes one candidate key per registry
//! extension, in registry order, and the first object found wins.

use std::sync::Arc;

use bytes::Bytes;
use imgscale_core::{PipelineError, SourceKey};
use imgscale_processing::ExtensionRegistry;
use imgscale_storage::{Storage, StorageError};

/// Outcome of a single probe attempt.
///
/// A missing object and a failed fetch both move the probe along, but they
/// are distinct events: a miss is expected, a transport failure is not.
#[derive(Debug)]
enum FetchAttempt {
    Found(Bytes),
    Missing,
    TransportError(StorageError),
}

/// A source object located by probing.
#[derive(Debug)]
pub struct ResolvedSource {
    /// Key the object was actually found under.
    pub key: String,
    pub data: Bytes,
}

/// Locates source objects by probing candidate keys.
pub struct SourceResolver {
    storage: Arc<dyn Storage>,
}

impl SourceResolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        SourceResolver { storage }
    }

    /// Probe candidate keys for the requested source, in registry order.
    ///
    /// Probing is sequential so the registry order stays authoritative.
    /// Exhausting every candidate yields `SourceUnavailable`.
    pub async fn resolve(
        &self,
        source: &SourceKey,
        registry: &ExtensionRegistry,
    ) -> Result<ResolvedSource, PipelineError> {
        let mut attempts = 0;

        for candidate in registry.extensions() {
            let key = source.with_extension(candidate);
            attempts += 1;

            match self.fetch(&key).await {
                FetchAttempt::Found(data) => {
                    tracing::info!(
                        key = %key,
                        size_bytes = data.len(),
                        attempts,
                        "Resolved source object"
                    );
                    return Ok(ResolvedSource { key, data });
                }
                FetchAttempt::Missing => {
                    tracing::debug!(key = %key, "Source candidate missing");
                }
                FetchAttempt::TransportError(error) => {
                    tracing::warn!(key = %key, error = %error, "Source candidate fetch failed");
                }
            }
        }

        Err(PipelineError::SourceUnavailable {
            key: source.as_str().to_string(),
            attempts,
        })
    }

    async fn fetch(&self, key: &str) -> FetchAttempt {
        match self.storage.download(key).await {
            Ok(data) => FetchAttempt::Found(data),
            Err(StorageError::NotFound(_)) => FetchAttempt::Missing,
            Err(error) => FetchAttempt::TransportError(error),
        }
    }
}
