//! Request handling ahead of dispatch.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade handshakes (HTTP/1.1 and HTTP/2 extended CONNECT)
//! - Buffer the request body within the configured limit
//! - Emit the per-request operational log lines
//!
//! # Design Decisions
//! - The body is read once into `Bytes`; rendering and logging share that copy
//! - Verbose header/body logging is switched per request by environment

use axum::body::Body;
use axum::http::{header, request::Parts, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::echo::policy::{LOG_HTTP_BODY, LOG_HTTP_HEADERS};
use crate::echo::render::render_headers;
use crate::echo::{Environment, InboundRequest};

/// True when the request asks to be upgraded to a WebSocket.
pub fn is_websocket_upgrade(parts: &Parts) -> bool {
    if parts.method == Method::CONNECT {
        return parts
            .extensions
            .get::<hyper::ext::Protocol>()
            .is_some_and(|p| p.as_str().eq_ignore_ascii_case("websocket"));
    }

    parts.method == Method::GET
        && header_has_token(&parts.headers, header::CONNECTION, "upgrade")
        && header_has_token(&parts.headers, header::UPGRADE, "websocket")
}

fn header_has_token(headers: &HeaderMap, name: header::HeaderName, token: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|t| t.trim().eq_ignore_ascii_case(token))
}

/// Read the whole body, rejecting it when it exceeds `limit` bytes.
pub async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, Response> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!(error = %e, limit, "Failed to buffer request body");
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large\n").into_response()
    })
}

/// Log the request line, and headers/body when enabled.
pub fn log_request(env: &Environment, request: &InboundRequest) {
    let verbose = env.enabled(LOG_HTTP_HEADERS) || env.enabled(LOG_HTTP_BODY);
    tracing::info!(
        remote_addr = %request.remote_addr,
        method = %request.method,
        uri = %request.target,
        verbose,
        "Request"
    );

    if env.enabled(LOG_HTTP_HEADERS) {
        tracing::info!(
            remote_addr = %request.remote_addr,
            "Headers\nHost: {}\n{}",
            request.host,
            render_headers(&request.headers)
        );
    }

    if env.enabled(LOG_HTTP_BODY) && !request.body.is_empty() {
        tracing::info!(
            remote_addr = %request.remote_addr,
            "Body:\n{}",
            String::from_utf8_lossy(&request.body)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn detects_http1_upgrade() {
        let upgrade = parts(
            Request::builder()
                .uri("/")
                .header("connection", "keep-alive, Upgrade")
                .header("upgrade", "WebSocket"),
        );
        assert!(is_websocket_upgrade(&upgrade));
    }

    #[test]
    fn plain_requests_are_not_upgrades() {
        assert!(!is_websocket_upgrade(&parts(Request::builder().uri("/"))));

        let wrong_protocol = parts(
            Request::builder()
                .uri("/")
                .header("connection", "upgrade")
                .header("upgrade", "h2c"),
        );
        assert!(!is_websocket_upgrade(&wrong_protocol));

        let post = parts(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("connection", "upgrade")
                .header("upgrade", "websocket"),
        );
        assert!(!is_websocket_upgrade(&post));
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let ok = buffer_body(Body::from("12345"), 5).await.unwrap();
        assert_eq!(&ok[..], b"12345");

        let rejected = buffer_body(Body::from("123456"), 5).await.unwrap_err();
        assert_eq!(rejected.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
