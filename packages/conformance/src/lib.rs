//! Shared helpers for the conformance test suite.
//!
//! Provides [`spawn_server`], which binds a `TcpListener` on an ephemeral
//! port and serves the reference router (echo method, core capability,
//! default limits) from a background task.

use std::sync::Arc;

use jmap_api::CapabilitySet;
use jmap_core::{MethodRegistry, RequestProcessor};
use jmap_server::{build_router, ServerConfig};

/// `sessionState` reported by every server started with [`spawn_server`].
pub const SESSION_STATE: &str = "conformance-state";

/// Start an ephemeral in-process server and return the full API URL, e.g.
/// `http://127.0.0.1:51234/jmap/api`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the server fails to start.
pub async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let config = ServerConfig {
        bind_addr: addr,
        session_state: Some(SESSION_STATE.into()),
        ..ServerConfig::default()
    };
    let api_url = format!("http://{addr}{}", config.api_path);

    let processor = Arc::new(RequestProcessor::new(
        MethodRegistry::with_reference_methods(),
    ));
    let router = build_router(processor, CapabilitySet::core(), &config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    api_url
}
