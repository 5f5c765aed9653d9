//! Imgscale API Library
//!
//! HTTP surface for the derivative pipeline: handlers, application state,
//! the pipeline itself, and server setup.

// Module declarations
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod resolver;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
