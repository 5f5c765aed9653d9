//! Derivative request pipeline.
//!
//! One request flows through a fixed stage order: path parsing, the
//! resolution allow-list, the extension registry, source resolution, the
//! transform, and the derivative write. Every stage either passes the request
//! on or terminates it with a `PipelineError`.

use std::time::Instant;

use imgscale_core::{apply_prefix, PipelineError, SourceKey, TransformRequest};
use imgscale_processing::ImageTransformer;

use crate::resolver::SourceResolver;
use crate::state::AppState;

/// Tags attached to every derivative write. Bucket lifecycle rules keyed on
/// `lifetime=transient` can expire derivatives without touching originals.
const DERIVATIVE_TAGS: &[(&str, &str)] = &[("lifetime", "transient")];

/// Successful outcome: where to send the client.
#[derive(Debug, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

/// Run the pipeline for one raw transform path.
///
/// The allow-list gate runs before the extension check, so a denied
/// resolution is refused even for formats the service would otherwise
/// redirect past untouched.
pub async fn run(state: &AppState, raw_path: &str) -> Result<Redirect, PipelineError> {
    let started = Instant::now();

    let request = TransformRequest::parse(raw_path)?;
    state.policy.check(&request.resolution_token)?;

    let prefixed = apply_prefix(state.config.prefix.as_deref(), &request.source_key);
    let source = SourceKey::parse(prefixed);

    let Some(format) = source.extension().and_then(|ext| state.registry.lookup(ext)) else {
        tracing::debug!(
            key = source.as_str(),
            "Extension not transformable, redirecting to original"
        );
        return Ok(Redirect {
            location: source.as_str().to_string(),
        });
    };

    let resolver = SourceResolver::new(state.storage.clone());
    let resolved = resolver.resolve(&source, &state.registry).await?;
    let found_key = resolved.key;

    let target = request.resolution;
    let data = resolved.data;
    let derivative =
        tokio::task::spawn_blocking(move || ImageTransformer::transform(&data, target, format))
            .await
            .map_err(|e| PipelineError::Internal {
                message: "derivative transform task failed".to_string(),
                source: anyhow::Error::new(e),
            })?
            .map_err(|e| PipelineError::DecodeFailed {
                key: found_key.clone(),
                source: e,
            })?;

    let size_bytes = derivative.len();
    state
        .storage
        .upload(
            &request.cache_key,
            derivative,
            format.to_mime_type(),
            DERIVATIVE_TAGS,
        )
        .await
        .map_err(|e| PipelineError::CacheWriteFailed {
            key: request.cache_key.clone(),
            source: anyhow::Error::new(e),
        })?;

    tracing::info!(
        source_key = %found_key,
        cache_key = %request.cache_key,
        content_type = format.to_mime_type(),
        size_bytes,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Derivative stored"
    );

    let location = format!(
        "{}/{}",
        state.config.public_base_url.trim_end_matches('/'),
        request.cache_key
    );
    Ok(Redirect { location })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use imgscale_core::Config;
    use imgscale_storage::{Storage, StorageBackend, StorageError};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    struct UploadRecord {
        key: String,
        data: Bytes,
        content_type: String,
        tags: Vec<(String, String)>,
    }

    /// Storage double that serves seeded objects and records every call.
    struct RecordingStorage {
        objects: HashMap<String, Bytes>,
        fail_uploads: bool,
        downloads: Mutex<Vec<String>>,
        uploads: Mutex<Vec<UploadRecord>>,
    }

    impl RecordingStorage {
        fn new() -> Self {
            RecordingStorage {
                objects: HashMap::new(),
                fail_uploads: false,
                downloads: Mutex::new(Vec::new()),
                uploads: Mutex::new(Vec::new()),
            }
        }

        fn with_object(mut self, key: &str, data: Bytes) -> Self {
            self.objects.insert(key.to_string(), data);
            self
        }

        fn with_failing_uploads(mut self) -> Self {
            self.fail_uploads = true;
            self
        }

        fn download_count(&self) -> usize {
            self.downloads.lock().unwrap().len()
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        async fn download(&self, key: &str) -> Result<Bytes, StorageError> {
            self.downloads.lock().unwrap().push(key.to_string());
            self.objects
                .get(key)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))
        }

        async fn upload(
            &self,
            key: &str,
            data: Bytes,
            content_type: &str,
            tags: &[(&str, &str)],
        ) -> Result<(), StorageError> {
            if self.fail_uploads {
                return Err(StorageError::UploadFailed("put rejected".to_string()));
            }
            self.uploads.lock().unwrap().push(UploadRecord {
                key: key.to_string(),
                data,
                content_type: content_type.to_string(),
                tags: tags
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
            Ok(())
        }

        async fn exists(&self, key: &str) -> Result<bool, StorageError> {
            Ok(self.objects.contains_key(key))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn test_config() -> Config {
        Config {
            bucket: "media".to_string(),
            allowed_resolutions: vec!["200x200".to_string()],
            prefix: Some("images".to_string()),
            public_base_url: "https://cdn.example.com".to_string(),
            storage_backend: StorageBackend::Local,
            local_storage_path: None,
            aws_region: None,
            aws_endpoint_url: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
        }
    }

    fn app_state(config: Config, storage: RecordingStorage) -> (AppState, Arc<RecordingStorage>) {
        let storage = Arc::new(storage);
        (AppState::new(config, storage.clone()), storage)
    }

    fn png_fixture(width: u32, height: u32) -> Bytes {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buf)
    }

    fn decoded_dimensions(data: &Bytes) -> (u32, u32) {
        let img = image::ImageReader::new(Cursor::new(data.as_ref()))
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        (img.width(), img.height())
    }

    #[tokio::test]
    async fn test_success_writes_derivative_and_redirects() {
        let (state, storage) = app_state(
            test_config(),
            RecordingStorage::new().with_object("images/cat.png", png_fixture(400, 300)),
        );

        let redirect = run(&state, "200x200/cat.png").await.unwrap();

        assert_eq!(
            redirect.location,
            "https://cdn.example.com/200x200/cat.png"
        );

        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        let record = &uploads[0];
        assert_eq!(record.key, "200x200/cat.png");
        assert_eq!(record.content_type, "image/png");
        assert_eq!(
            record.tags,
            vec![("lifetime".to_string(), "transient".to_string())]
        );
        assert_eq!(decoded_dimensions(&record.data), (200, 150));
    }

    #[tokio::test]
    async fn test_denied_resolution_refused_before_extension_check() {
        let (state, storage) = app_state(test_config(), RecordingStorage::new());

        let err = run(&state, "999x999/report.txt").await.unwrap_err();

        assert_eq!(err.error_type(), "ResolutionDenied");
        assert_eq!(storage.download_count(), 0);
        assert_eq!(storage.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_redirects_to_prefixed_original() {
        let (state, storage) = app_state(test_config(), RecordingStorage::new());

        let redirect = run(&state, "200x200/report.txt").await.unwrap();

        assert_eq!(redirect.location, "images/report.txt");
        assert_eq!(storage.download_count(), 0);
        assert_eq!(storage.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_path_is_rejected() {
        let (state, storage) = app_state(test_config(), RecordingStorage::new());

        let err = run(&state, "no-resolution-here").await.unwrap_err();

        assert_eq!(err.error_type(), "MalformedPath");
        assert_eq!(storage.download_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_fatal() {
        let (state, _storage) = app_state(
            test_config(),
            RecordingStorage::new()
                .with_object("images/cat.png", png_fixture(400, 300))
                .with_failing_uploads(),
        );

        let err = run(&state, "200x200/cat.png").await.unwrap_err();

        match &err {
            PipelineError::CacheWriteFailed { key, .. } => {
                assert_eq!(key, "200x200/cat.png");
            }
            other => panic!("expected CacheWriteFailed, got {:?}", other),
        }
        assert!(err.is_fatal());
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_undecodable_source_is_fatal() {
        let (state, _storage) = app_state(
            test_config(),
            RecordingStorage::new()
                .with_object("images/cat.png", Bytes::from_static(b"not an image")),
        );

        let err = run(&state, "200x200/cat.png").await.unwrap_err();

        match &err {
            PipelineError::DecodeFailed { key, .. } => {
                assert_eq!(key, "images/cat.png");
            }
            other => panic!("expected DecodeFailed, got {:?}", other),
        }
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_not_doubled() {
        let mut config = test_config();
        config.public_base_url = "https://cdn.example.com/".to_string();
        let (state, _storage) = app_state(
            config,
            RecordingStorage::new().with_object("images/cat.png", png_fixture(400, 300)),
        );

        let redirect = run(&state, "200x200/cat.png").await.unwrap();

        assert_eq!(
            redirect.location,
            "https://cdn.example.com/200x200/cat.png"
        );
    }

    #[tokio::test]
    async fn test_no_prefix_leaves_key_bare() {
        let mut config = test_config();
        config.prefix = None;
        let (state, storage) = app_state(
            config,
            RecordingStorage::new().with_object("cat.png", png_fixture(100, 100)),
        );

        let redirect = run(&state, "200x200/cat.png").await.unwrap();

        assert_eq!(
            redirect.location,
            "https://cdn.example.com/200x200/cat.png"
        );
        assert_eq!(storage.downloads.lock().unwrap()[0], "cat.jpg");
    }
}
