//! `jmap-server`: reference HTTP server for the batched method-call API.
//!
//! # Quick start
//!
//! ```sh
//! # Default port, API at /jmap/api:
//! jmap-server
//!
//! # Custom bind address and a fixed session state:
//! JMAP_BIND=127.0.0.1:9000 JMAP_SESSION_STATE=s1 jmap-server
//!
//! curl -s localhost:8080/jmap/api -d '{
//!   "using": ["urn:ietf:params:jmap:core"],
//!   "methodCalls": [["Core/echo", {"hello": "world"}, "c1"]]
//! }'
//! ```
//!
//! # Environment variables
//!
//! See [`jmap_server::ServerConfig`] for the full list.

use std::process;
use std::sync::Arc;

use jmap_api::CapabilitySet;
use jmap_core::{MethodRegistry, RequestProcessor};
use jmap_server::{build_router, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jmap_server=info,tower_http=debug".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            process::exit(2);
        }
    };

    let processor = Arc::new(RequestProcessor::new(
        MethodRegistry::with_reference_methods(),
    ));
    tracing::info!(
        "methods: {}",
        processor
            .registry()
            .names()
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "limits: maxSizeRequest = {}, maxCallsInRequest = {}",
        config.limits.max_size_request,
        config.limits.max_calls_in_request
    );

    let app = build_router(processor, CapabilitySet::core(), &config);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", config.bind_addr);
            process::exit(1);
        }
    };
    tracing::info!("listening on {}{}", config.bind_addr, config.api_path);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}
