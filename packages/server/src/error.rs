//! HTTP mapping for request-level errors.
//!
//! A rejected envelope is answered with `400 Bad Request` and the
//! [`RequestError`] serialised as an `application/problem+json` body.
//! Per-call failures never come through here; they are part of a normal
//! `200` response.

use axum::{
    extract::rejection::BytesRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jmap_core::RequestError;

/// Media type of problem documents (RFC 7807).
pub const PROBLEM_JSON: &str = "application/problem+json";

/// An error a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// The envelope was rejected.
    Request(RequestError),
    /// The body could not be read for a reason other than its size.
    Body(BytesRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Request(e) => {
                let status = StatusCode::from_u16(e.status).unwrap_or(StatusCode::BAD_REQUEST);
                (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(e)).into_response()
            }
            AppError::Body(rejection) => rejection.into_response(),
        }
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::Request(e)
    }
}
