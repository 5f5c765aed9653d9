//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgscale-api --test resize_test` or
//! `cargo test -p imgscale-api`.

pub mod fixtures;

use std::sync::Arc;

use axum_test::TestServer;
use bytes::Bytes;
use imgscale_api::setup::routes::build_router;
use imgscale_api::state::AppState;
use imgscale_core::{Config, StorageBackend};
use imgscale_storage::{LocalStorage, ObjectMetadata, Storage, StorageError};
use tempfile::TempDir;

/// Test application: server plus the storage it reads and writes.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Seed a source object.
    pub async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) {
        self.storage
            .upload(key, Bytes::from(data), content_type, &[])
            .await
            .expect("Failed to seed object");
    }

    /// Fetch a stored object, or None when nothing was written there.
    pub async fn get_object(&self, key: &str) -> Option<Bytes> {
        match self.storage.download(key).await {
            Ok(data) => Some(data),
            Err(StorageError::NotFound(_)) => None,
            Err(e) => panic!("Failed to read object '{}': {}", key, e),
        }
    }

    pub async fn object_exists(&self, key: &str) -> bool {
        self.storage
            .exists(key)
            .await
            .expect("Failed to check object existence")
    }

    /// Metadata sidecar written alongside a stored object.
    pub async fn object_metadata(&self, key: &str) -> ObjectMetadata {
        self.storage
            .read_metadata(key)
            .await
            .expect("Failed to read object metadata")
    }
}

/// Config pointing at throwaway local storage with a typical allow-list.
pub fn test_config() -> Config {
    Config {
        bucket: "media".to_string(),
        allowed_resolutions: vec![
            "100x100".to_string(),
            "200x200".to_string(),
            "640x480".to_string(),
        ],
        prefix: Some("images".to_string()),
        public_base_url: "https://cdn.example.com".to_string(),
        storage_backend: StorageBackend::Local,
        local_storage_path: None,
        aws_region: None,
        aws_endpoint_url: None,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
    }
}

/// Setup test app over local storage in a temp directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config()).await
}

pub async fn setup_test_app_with_config(config: Config) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let storage = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(config, storage.clone() as Arc<dyn Storage>));

    let server = TestServer::new(build_router(state)).expect("Failed to start test server");

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}
