//! Image transformer - produces derivatives from source bytes
//!
//! The transform chain is fixed: decode, bake in EXIF orientation, max-fit
//! resize, encode to the requested format. Lossy formats are encoded at a
//! fixed quality; PNG stays lossless.

use std::io::Cursor;

use anyhow::Context;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use imgscale_core::Resolution;

use crate::orientation;
use crate::registry::EncodeFormat;
use crate::resize;

/// Encoding quality for JPEG and WebP derivatives.
const LOSSY_QUALITY: u8 = 75;

/// Produces derivatives from original image bytes.
pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode source bytes, normalize orientation, fit into the target box,
    /// and encode to the requested format.
    ///
    /// The source format is sniffed from the bytes, so the source does not
    /// have to match the requested output format.
    pub fn transform(
        data: &[u8],
        target: Resolution,
        format: EncodeFormat,
    ) -> Result<Bytes, anyhow::Error> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .context("failed to sniff source image format")?
            .decode()
            .context("failed to decode source image")?;

        tracing::debug!(
            source_bytes = data.len(),
            source_width = img.width(),
            source_height = img.height(),
            "Decoded source image"
        );

        let img = orientation::auto_orient(img, data);
        let img = resize::resize_to_fit(img, target);

        match format {
            EncodeFormat::Jpeg => Self::encode_jpeg(&img),
            EncodeFormat::Png => Self::encode_png(&img),
            EncodeFormat::WebP => Self::encode_webp(&img),
        }
    }

    fn encode_jpeg(img: &DynamicImage) -> Result<Bytes, anyhow::Error> {
        // JPEG has no alpha channel
        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, LOSSY_QUALITY);
        encoder
            .encode_image(&rgb)
            .context("failed to encode JPEG derivative")?;

        Ok(Bytes::from(buffer))
    }

    fn encode_png(img: &DynamicImage) -> Result<Bytes, anyhow::Error> {
        let estimated_size = img.width() as usize * img.height() as usize * 3;
        let mut buffer = Vec::with_capacity(estimated_size);
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png)
            .context("failed to encode PNG derivative")?;

        Ok(Bytes::from(buffer))
    }

    fn encode_webp(img: &DynamicImage) -> Result<Bytes, anyhow::Error> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let encoded = encoder.encode(LOSSY_QUALITY as f32);

        Ok(Bytes::copy_from_slice(&encoded))
    }
}
