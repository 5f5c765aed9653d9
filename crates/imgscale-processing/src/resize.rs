//! Max-fit resizing.
//!
//! Derivatives are scaled to the largest size that fits inside the requested
//! bounding box. The aspect ratio is always preserved and images are never
//! cropped or upscaled; a source that already fits passes through untouched.

use image::imageops::FilterType;
use image::DynamicImage;
use imgscale_core::Resolution;

/// Compute output dimensions for a max-fit resize into `target`.
pub fn fit_within(source_width: u32, source_height: u32, target: Resolution) -> (u32, u32) {
    if source_width == 0 || source_height == 0 {
        return (source_width, source_height);
    }

    let scale_width = target.width as f32 / source_width as f32;
    let scale_height = target.height as f32 / source_height as f32;
    let scale = scale_width.min(scale_height).min(1.0);

    let width = ((source_width as f32 * scale).round() as u32).max(1);
    let height = ((source_height as f32 * scale).round() as u32).max(1);

    (width, height)
}

/// Select appropriate filter type based on resize ratio
fn select_filter(
    source_width: u32,
    source_height: u32,
    new_width: u32,
    new_height: u32,
) -> FilterType {
    let width_ratio = source_width as f32 / new_width as f32;
    let height_ratio = source_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Resize an image to fit inside the target box.
pub fn resize_to_fit(img: DynamicImage, target: Resolution) -> DynamicImage {
    let source_width = img.width();
    let source_height = img.height();
    let (width, height) = fit_within(source_width, source_height, target);

    if (width, height) == (source_width, source_height) {
        return img;
    }

    let filter = select_filter(source_width, source_height, width, height);

    tracing::debug!(
        source_width,
        source_height,
        width,
        height,
        filter = ?filter,
        "Resizing image"
    );

    img.resize_exact(width, height, filter)
}
