//! HTTP error response conversion
//!
//! The pipeline surfaces exactly two client-visible outcomes besides the
//! redirect: refusal (403) and internal failure (500). Neither carries a
//! body; everything diagnostic goes to the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use imgscale_core::{LogLevel, PipelineError};

/// Wrapper type for PipelineError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for PipelineError (external type from
/// imgscale-core)
#[derive(Debug)]
pub struct HttpAppError(pub PipelineError);

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(PipelineError::from(err))
    }
}

fn log_error(error: &PipelineError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request refused");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request refused");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Pipeline failure"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;

        log_error(error);

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusals_render_as_403() {
        let denied = PipelineError::ResolutionDenied {
            requested: "999x999".to_string(),
            allowed: vec!["100x100".to_string()],
        };
        let response = HttpAppError(denied).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let malformed = PipelineError::malformed("no slash");
        let response = HttpAppError(malformed).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_fatal_errors_render_as_500() {
        let fatal = PipelineError::CacheWriteFailed {
            key: "200x200/cat.png".to_string(),
            source: anyhow::anyhow!("disk full"),
        };
        let response = HttpAppError(fatal).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_errors_become_internal() {
        let err: HttpAppError = anyhow::anyhow!("boom").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
