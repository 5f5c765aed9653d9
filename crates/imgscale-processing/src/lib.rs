//! Imgscale Processing Library
//!
//! Image operations for the derivative pipeline: the supported-format
//! registry, EXIF orientation correction, max-fit resizing, and the
//! transformer that chains them together.

pub mod orientation;
pub mod registry;
pub mod resize;
pub mod transformer;

// Re-export commonly used types
pub use registry::{EncodeFormat, ExtensionRegistry};
pub use transformer::ImageTransformer;
