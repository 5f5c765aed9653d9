//! Test fixtures: decodable image blobs.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};

/// PNG with a gradient so resizes have real pixel data to work on.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    gradient(width, height)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buf
}

/// JPEG fixture for probe fallback and content type scenarios.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    let img = gradient(width, height).to_rgb8();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode_image(&img)
        .expect("Failed to encode JPEG fixture");
    buf
}

/// Decode an encoded image and return its dimensions.
pub fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .expect("Failed to sniff fixture format")
        .decode()
        .expect("Failed to decode fixture");
    (img.width(), img.height())
}

/// Container format an encoded blob actually uses.
pub fn detected_format(data: &[u8]) -> ImageFormat {
    image::guess_format(data).expect("Failed to detect image format")
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}
