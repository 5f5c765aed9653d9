//! Pipeline error taxonomy.
//!
//! Rejections (`MalformedPath`, `ResolutionDenied`, `SourceUnavailable`) are
//! expected outcomes that terminate a request with 403. The fatal variants
//! (`DecodeFailed`, `CacheWriteFailed`, `Internal`) indicate a deployment or
//! data problem: they are logged with full context and re-raised to the
//! invoking environment instead of being turned into a pipeline response.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected rejections like malformed paths
    Debug,
    /// Warning level - for denials worth surfacing, like exhausted source probes
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("malformed transform path: {reason}")]
    MalformedPath { reason: String },

    #[error("resolution '{requested}' is not allowed, allowed: {allowed:?}")]
    ResolutionDenied {
        requested: String,
        allowed: Vec<String>,
    },

    #[error("no source object found for '{key}' after {attempts} probe(s)")]
    SourceUnavailable { key: String, attempts: usize },

    #[error("failed to decode or transform source object '{key}'")]
    DecodeFailed {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write derivative '{key}'")]
    CacheWriteFailed {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        PipelineError::MalformedPath {
            reason: reason.into(),
        }
    }

    /// Whether this error must be re-raised to the invoking environment
    /// rather than answered with a pipeline-level response.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::DecodeFailed { .. }
                | PipelineError::CacheWriteFailed { .. }
                | PipelineError::Internal { .. }
        )
    }

    /// HTTP status code the invoking environment should answer with.
    pub fn http_status_code(&self) -> u16 {
        if self.is_fatal() {
            500
        } else {
            403
        }
    }

    /// Get the error type name for structured log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::MalformedPath { .. } => "MalformedPath",
            PipelineError::ResolutionDenied { .. } => "ResolutionDenied",
            PipelineError::SourceUnavailable { .. } => "SourceUnavailable",
            PipelineError::DecodeFailed { .. } => "DecodeFailed",
            PipelineError::CacheWriteFailed { .. } => "CacheWriteFailed",
            PipelineError::Internal { .. } => "Internal",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::MalformedPath { .. } | PipelineError::ResolutionDenied { .. } => {
                LogLevel::Debug
            }
            PipelineError::SourceUnavailable { .. } => LogLevel::Warn,
            PipelineError::DecodeFailed { .. }
            | PipelineError::CacheWriteFailed { .. }
            | PipelineError::Internal { .. } => LogLevel::Error,
        }
    }

    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str(" -> ...");
                break;
            }
            details.push_str(&format!(" -> {}", err));
            source = err.source();
        }

        details
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_map_to_403() {
        let errors = [
            PipelineError::malformed("no slash"),
            PipelineError::ResolutionDenied {
                requested: "999x999".to_string(),
                allowed: vec!["100x100".to_string()],
            },
            PipelineError::SourceUnavailable {
                key: "media/cat.png".to_string(),
                attempts: 4,
            },
        ];
        for err in &errors {
            assert_eq!(err.http_status_code(), 403);
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_fatal_errors_map_to_500() {
        let decode = PipelineError::DecodeFailed {
            key: "media/cat.png".to_string(),
            source: anyhow::anyhow!("not an image"),
        };
        let write = PipelineError::CacheWriteFailed {
            key: "200x200/cat.png".to_string(),
            source: anyhow::anyhow!("put rejected"),
        };
        assert!(decode.is_fatal());
        assert!(write.is_fatal());
        assert_eq!(decode.http_status_code(), 500);
        assert_eq!(write.http_status_code(), 500);
        assert_eq!(decode.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("connection refused").context("put rejected");
        let err = PipelineError::CacheWriteFailed {
            key: "200x200/cat.png".to_string(),
            source,
        };
        let details = err.detailed_message();
        assert!(details.contains("200x200/cat.png"));
        assert!(details.contains("put rejected"));
        assert!(details.contains("connection refused"));
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: PipelineError = anyhow::anyhow!("join error").into();
        assert_eq!(err.error_type(), "Internal");
        assert!(err.is_fatal());
    }
}
