//! Application state.
//!
//! Every pipeline collaborator is constructed once at startup and shared
//! through `Arc<AppState>`. Nothing reads process environment after boot, so
//! a request sees one consistent configuration for its whole lifetime.

use std::sync::Arc;

use imgscale_core::{Config, ResolutionPolicy};
use imgscale_processing::ExtensionRegistry;
use imgscale_storage::Storage;

/// Main application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub policy: ResolutionPolicy,
    pub registry: ExtensionRegistry,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let policy = ResolutionPolicy::from_config(&config);
        AppState {
            config,
            storage,
            policy,
            registry: ExtensionRegistry::standard(),
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
