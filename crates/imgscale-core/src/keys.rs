//! Source key construction.
//!
//! Key handling is structural: the optional storage prefix is applied once,
//! and the extension is whatever follows the last `.` in the final path
//! segment. Candidate keys for fallback probing are rebuilt from the base and
//! a candidate extension rather than by textual substitution, so a key like
//! `png-exports/cat.png` never has its directory name rewritten.

/// Apply the configured key prefix, if any.
///
/// An absent or empty prefix leaves the key unchanged; otherwise the result
/// is `{prefix}/{key}`.
pub fn apply_prefix(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}/{}", prefix, key),
        _ => key.to_string(),
    }
}

/// A prefixed source key split into base and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    key: String,
    base_len: usize,
    extension: Option<String>,
}

impl SourceKey {
    /// Split a key on the last `.` of its final path segment.
    ///
    /// The extension token is lowercased so that lookups against the format
    /// registry are case-insensitive, while the key itself keeps its original
    /// spelling. A final segment without a `.` yields no extension.
    pub fn parse(key: impl Into<String>) -> Self {
        let key = key.into();
        let segment_start = key.rfind('/').map_or(0, |idx| idx + 1);

        match key[segment_start..].rfind('.') {
            Some(dot) => {
                let base_len = segment_start + dot;
                let extension = key[base_len + 1..].to_lowercase();
                SourceKey {
                    base_len,
                    extension: Some(extension),
                    key,
                }
            }
            None => SourceKey {
                base_len: key.len(),
                extension: None,
                key,
            },
        }
    }

    /// The key exactly as requested.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Lowercased extension token, when the final segment has one.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Key to probe for a candidate extension.
    ///
    /// When the candidate matches the requested extension the original key is
    /// returned untouched, preserving its exact spelling. Otherwise the key is
    /// rebuilt as `{base}.{candidate}`.
    pub fn with_extension(&self, candidate: &str) -> String {
        match &self.extension {
            Some(extension) if extension == candidate => self.key.clone(),
            _ => format!("{}.{}", &self.key[..self.base_len], candidate),
        }
    }
}
