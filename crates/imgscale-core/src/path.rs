//! Request path parsing.
//!
//! The inbound `path` query parameter has the form
//! `{width}x{height}/{originalKey}`. Parsing is a hard validation gate:
//! anything that does not match the strict pattern is rejected as
//! `MalformedPath` and never reaches the rest of the pipeline.

use std::fmt::{Display, Formatter, Result as FmtResult};

use anyhow::Context;
use regex::Regex;

use crate::error::PipelineError;

/// Pattern for the transform path. The full resolution token is captured
/// separately because the allow-list matches it verbatim.
const PATH_PATTERN: &str = r"^((\d+)x(\d+))/(.+)$";

/// Target bounding box for the resize, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parsed form of the `path` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub resolution: Resolution,
    /// Resolution exactly as written in the request (e.g. `"0100x100"`).
    /// The allow-list matches this token, not the numeric value.
    pub resolution_token: String,
    /// Original object key; may contain slashes.
    pub source_key: String,
    /// The full request path. The derivative is written to this key and the
    /// success redirect points at it.
    pub cache_key: String,
}

impl TransformRequest {
    /// Parse a raw transform path into its typed form.
    pub fn parse(raw: &str) -> Result<TransformRequest, PipelineError> {
        let pattern =
            Regex::new(PATH_PATTERN).context("failed to compile transform path pattern")?;

        let captures = pattern.captures(raw).ok_or_else(|| {
            PipelineError::malformed(format!(
                "'{}' does not match {{width}}x{{height}}/{{key}}",
                raw
            ))
        })?;

        let width = captures[2]
            .parse::<u32>()
            .map_err(|_| PipelineError::malformed(format!("width '{}' out of range", &captures[2])))?;
        let height = captures[3].parse::<u32>().map_err(|_| {
            PipelineError::malformed(format!("height '{}' out of range", &captures[3]))
        })?;

        if width == 0 || height == 0 {
            return Err(PipelineError::malformed(
                "width and height must be positive",
            ));
        }

        Ok(TransformRequest {
            resolution: Resolution { width, height },
            resolution_token: captures[1].to_string(),
            source_key: captures[4].to_string(),
            cache_key: raw.to_string(),
        })
    }
}
