//! HTTP request handlers.
//!
//! The server exposes a single endpoint, the API endpoint that accepts
//! batched requests. Handlers are async functions that receive Axum
//! extractors and return `Result<impl IntoResponse, AppError>`.

pub mod api;

use std::sync::Arc;

use jmap_api::{CapabilitySet, Limits};
use jmap_core::RequestProcessor;

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    /// Executes validated requests. Shared by all in-flight requests; it holds
    /// no per-request state.
    pub processor: Arc<RequestProcessor>,
    /// Capabilities accepted in `using`.
    pub capabilities: Arc<CapabilitySet>,
    pub limits: Limits,
    /// Reported as `sessionState` in every response.
    pub session_state: Arc<str>,
}
