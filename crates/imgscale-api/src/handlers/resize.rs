//! On-demand derivative endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use imgscale_core::PipelineError;
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::pipeline;
use crate::state::AppState;

/// Query parameters for the resize endpoint.
#[derive(Debug, Deserialize)]
pub struct ResizeParams {
    /// Transform path of the form `{width}x{height}/{originalKey}`.
    pub path: Option<String>,
}

/// Serve a derivative for `?path={width}x{height}/{key}`.
///
/// The derivative itself is never streamed from here: every successful
/// outcome is a redirect, either to the freshly written derivative behind
/// the public base URL or straight to the untransformable original.
pub async fn resize(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResizeParams>,
) -> Result<Response, HttpAppError> {
    let raw_path = params
        .path
        .ok_or_else(|| PipelineError::malformed("missing 'path' query parameter"))?;

    let redirect = pipeline::run(&state, &raw_path).await?;

    // A 301 specifically; axum's Redirect::permanent is a 308.
    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, redirect.location)],
    )
        .into_response())
}
