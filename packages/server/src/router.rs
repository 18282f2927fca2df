//! Assembles the Axum [`Router`].

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use jmap_api::CapabilitySet;
use jmap_core::RequestProcessor;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    handlers::{api, AppState},
};

/// Build the complete application router with shared state.
///
/// When `config.session_state` is unset, a UUIDv7 generated here is used for
/// the lifetime of the router.
pub fn build_router(
    processor: Arc<RequestProcessor>,
    capabilities: CapabilitySet,
    config: &ServerConfig,
) -> Router {
    let session_state = config
        .session_state
        .clone()
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let state = AppState {
        processor,
        capabilities: Arc::new(capabilities),
        limits: config.limits,
        session_state: session_state.into(),
    };

    Router::new()
        .route(&config.api_path, post(api::execute))
        .with_state(state)
        // Reading stops once the body passes maxSizeRequest; the handler
        // reports that as a `limit` problem.
        .layer(DefaultBodyLimit::max(config.limits.max_size_request))
        .layer(TraceLayer::new_for_http())
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        http::{header, Request, StatusCode},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_stream::StreamExt;
    use http_body_util::BodyExt;
    use jmap_api::Limits;
    use jmap_core::MethodRegistry;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(limits: Limits) -> Router {
        let config = ServerConfig {
            limits,
            session_state: Some("state-1".into()),
            ..ServerConfig::default()
        };
        let processor = Arc::new(RequestProcessor::new(
            MethodRegistry::with_reference_methods(),
        ));
        build_router(processor, CapabilitySet::core(), &config)
    }

    async fn send(app: Router, body: impl Into<Body>) -> (StatusCode, Option<String>, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/jmap/api")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn echo_round_trip() {
        let body = json!({
            "using": ["urn:ietf:params:jmap:core"],
            "methodCalls": [["Core/echo", {"hello": true}, "c1"]]
        });
        let (status, content_type, resp) = send(app(Limits::default()), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(
            resp,
            json!({
                "methodResponses": [["Core/echo", {"hello": true}, "c1"]],
                "sessionState": "state-1"
            })
        );
    }

    #[tokio::test]
    async fn method_errors_are_still_200() {
        let body = json!({
            "using": [],
            "methodCalls": [["Mailbox/get", {}, "c1"]]
        });
        let (status, _, resp) = send(app(Limits::default()), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            resp["methodResponses"],
            json!([["error", {"type": "unknownMethod"}, "c1"]])
        );
    }

    #[tokio::test]
    async fn not_json_is_problem_document() {
        let (status, content_type, resp) = send(app(Limits::default()), "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/problem+json"));
        assert_eq!(resp["type"], "urn:ietf:params:jmap:error:notJSON");
        assert_eq!(resp["status"], 400);
    }

    #[tokio::test]
    async fn unknown_capability_rejected() {
        let body = json!({"using": ["urn:example:nope"], "methodCalls": []});
        let (status, _, resp) = send(app(Limits::default()), body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["type"], "urn:ietf:params:jmap:error:unknownCapability");
    }

    #[tokio::test]
    async fn oversized_body_is_limit_problem() {
        let limits = Limits {
            max_size_request: 16,
            ..Limits::default()
        };
        let body = json!({"using": [], "methodCalls": []}).to_string();
        let (status, _, resp) = send(app(limits), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["type"], "urn:ietf:params:jmap:error:limit");
        assert_eq!(resp["limit"], "maxSizeRequest");
    }

    #[tokio::test]
    async fn generated_session_state_is_stable() {
        let processor = Arc::new(RequestProcessor::new(
            MethodRegistry::with_reference_methods(),
        ));
        let app = build_router(processor, CapabilitySet::core(), &ServerConfig::default());
        let body = json!({"using": [], "methodCalls": []}).to_string();
        let (_, _, first) = send(app.clone(), body.clone()).await;
        let (_, _, second) = send(app, body).await;
        assert!(!first["sessionState"].as_str().unwrap().is_empty());
        assert_eq!(first["sessionState"], second["sessionState"]);
    }

    #[tokio::test]
    async fn streamed_body_over_limit_is_cut_off() {
        let limits = Limits {
            max_size_request: 16,
            ..Limits::default()
        };
        let chunks_read = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&chunks_read);
        let stream = tokio_stream::iter(0..256).map(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, std::io::Error>(Bytes::from(vec![b' '; 1024 * 1024]))
        });

        let (status, content_type, resp) = send(app(limits), Body::from_stream(stream)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/problem+json"));
        assert_eq!(resp["type"], "urn:ietf:params:jmap:error:limit");
        assert_eq!(resp["limit"], "maxSizeRequest");
        assert!(chunks_read.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn body_at_exact_limit_is_accepted() {
        let body = json!({"using": [], "methodCalls": []}).to_string();
        let limits = Limits {
            max_size_request: body.len(),
            ..Limits::default()
        };
        let (status, _, resp) = send(app(limits), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["methodResponses"], json!([]));
    }
}
