//! EXIF orientation correction.
//!
//! Cameras frequently store sensor-rotated pixels plus an orientation tag.
//! Derivatives are re-encoded without EXIF metadata, so the tag has to be
//! baked into the pixels before resizing.

use image::DynamicImage;

/// Read EXIF from the original bytes and normalize the image accordingly.
pub fn auto_orient(img: DynamicImage, data: &[u8]) -> DynamicImage {
    let orientation = read_orientation(data);
    apply_orientation(img, orientation)
}

/// Read the EXIF orientation tag, defaulting to 1 (normal) when the data has
/// no EXIF segment or the tag is absent or out of range.
pub fn read_orientation(data: &[u8]) -> u8 {
    let mut cursor = std::io::Cursor::new(data);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
        return 1;
    };

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map_or(1, |value| {
            if (1..=8).contains(&value) {
                value as u8
            } else {
                1
            }
        })
}

/// Apply the rotation and flips a given orientation value calls for.
pub fn apply_orientation(img: DynamicImage, orientation: u8) -> DynamicImage {
    let (rotation, flip_horizontal, flip_vertical) = orientation_transforms(orientation);

    if rotation.is_none() && !flip_horizontal && !flip_vertical {
        return img;
    }

    tracing::debug!(
        orientation,
        rotation = ?rotation,
        flip_horizontal,
        flip_vertical,
        "Applying EXIF orientation"
    );

    let mut img = img;

    // Rotation first, then flips
    img = match rotation {
        Some(90) => img.rotate90(),
        Some(180) => img.rotate180(),
        Some(270) => img.rotate270(),
        _ => img,
    };

    if flip_horizontal {
        img = img.fliph();
    }
    if flip_vertical {
        img = img.flipv();
    }

    img
}

/// Rotation and flip operations for an EXIF orientation value.
/// Returns (rotate_angle_cw, flip_horizontal, flip_vertical).
fn orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
    match orientation {
        1 => (None, false, false),      // Normal
        2 => (None, true, false),       // Mirror horizontal
        3 => (Some(180), false, false), // Rotate 180
        4 => (None, false, true),       // Mirror vertical
        5 => (Some(270), true, false),  // Mirror horizontal + Rotate 270 CW
        6 => (Some(90), false, false),  // Rotate 90 CW
        7 => (Some(90), true, false),   // Mirror horizontal + Rotate 90 CW
        8 => (Some(270), false, false), // Rotate 270 CW
        _ => (None, false, false),      // Invalid, treat as normal
    }
}
