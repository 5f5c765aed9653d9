//! Supported derivative formats.
//!
//! The registry is a fixed, ordered list. Its order matters twice: lookups
//! decide whether a request is transformable at all, and source probing walks
//! the extensions in registry order when falling back to sibling formats.

/// Encoding target for a derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    Jpeg,
    Png,
    WebP,
}

impl EncodeFormat {
    /// Canonical MIME type for the encoded output.
    pub fn to_mime_type(&self) -> &'static str {
        match self {
            EncodeFormat::Jpeg => "image/jpeg",
            EncodeFormat::Png => "image/png",
            EncodeFormat::WebP => "image/webp",
        }
    }
}

/// Ordered mapping of extension tokens to encode formats.
///
/// Tokens are matched exactly; callers normalize extensions to lowercase
/// before lookup.
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    formats: Vec<(&'static str, EncodeFormat)>,
}

impl ExtensionRegistry {
    /// The standard registry: jpg, jpeg, png, webp, in that probe order.
    pub fn standard() -> Self {
        ExtensionRegistry {
            formats: vec![
                ("jpg", EncodeFormat::Jpeg),
                ("jpeg", EncodeFormat::Jpeg),
                ("png", EncodeFormat::Png),
                ("webp", EncodeFormat::WebP),
            ],
        }
    }

    /// Encode format for an extension token, if supported.
    pub fn lookup(&self, extension: &str) -> Option<EncodeFormat> {
        self.formats
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, format)| *format)
    }

    /// Extension tokens in probe order.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.iter().map(|(ext, _)| *ext)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
