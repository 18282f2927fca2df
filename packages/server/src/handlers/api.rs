//! The API endpoint: `POST /jmap/api` by default.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use jmap_api::Limits;
use jmap_core::{RequestError, Response};

use crate::error::AppError;

use super::AppState;

/// `POST {api_path}`: execute a batched request.
///
/// The body is read under the router's `DefaultBodyLimit`, so an oversized
/// body is cut off as soon as it crosses `maxSizeRequest`. The bytes are then
/// validated by [`jmap_api::parse_request`]; a rejected envelope becomes a
/// 400 problem document and no call runs. A valid request is executed in full
/// and always answered with 200, whatever happened to individual calls.
pub async fn execute(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Response>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::debug!("request body over the size limit");
            AppError::Request(RequestError::limit(
                Limits::MAX_SIZE_REQUEST,
                format!(
                    "request is larger than the limit of {} octets",
                    state.limits.max_size_request
                ),
            ))
        } else {
            AppError::Body(rejection)
        }
    })?;

    let request = jmap_api::parse_request(&body, &state.capabilities, &state.limits)
        .inspect_err(|e| tracing::debug!(error = %e, "request rejected"))?;

    tracing::debug!(calls = request.method_calls.len(), "processing request");
    let response = state.processor.process(&request, &state.session_state);
    Ok(Json(response))
}
