//! Protocol dispatcher for everything not matched by a fixed route.
//!
//! # Responsibilities
//! - Evaluate the per-request response policy from a fresh environment snapshot
//! - Log every request before routing
//! - Pick the session type: WebSocket, UI page, SSE stream or plain echo
//!
//! # Data Flow
//! ```text
//! request
//!     → policy + logging
//!     → upgrade handshake?        → websocket::upgrade
//!     → final segment ".ws"?      → frontend::page
//!     → final segment ".sse"?     → sse::serve
//!     → otherwise                 → response::plain
//! ```
//!
//! # Design Decisions
//! - Upgrade detection comes first, so a handshake on a `.ws` path still opens
//!   a session instead of returning the page
//! - Segment matching is exact: `/x.sse` is plain, `/x/.sse` is a stream
//! - The hostname is looked up lazily, only when disclosure is on

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::echo::{Identity, InboundRequest, ResponsePolicy};
use crate::http::request::{buffer_body, is_websocket_upgrade, log_request};
use crate::http::server::AppState;
use crate::http::{frontend, response, sse, websocket};
use crate::observability::metrics;

/// Where a non-upgrade request is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Frontend,
    Sse,
    Plain,
}

impl Mode {
    /// Classify by the final path segment.
    pub fn classify(path: &str) -> Self {
        match final_segment(path) {
            ".ws" => Mode::Frontend,
            ".sse" => Mode::Sse,
            _ => Mode::Plain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Frontend => "frontend",
            Mode::Sse => "sse",
            Mode::Plain => "plain",
        }
    }
}

/// Last non-empty segment of a path, ignoring trailing slashes.
pub fn final_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Fallback handler: every request not claimed by a fixed route.
pub async fn echo_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 0)));

    let env = state.environment.snapshot();
    let (mut parts, body) = request.into_parts();
    let policy = ResponsePolicy::evaluate(&env, &parts.headers);

    if is_websocket_upgrade(&parts) {
        log_request(&env, &InboundRequest::from_parts(&parts, Bytes::new(), peer));
        let response = match WebSocketUpgrade::from_request_parts(&mut parts, &state).await {
            Ok(ws) => {
                let greeting = policy.disclose_hostname.then(|| Identity::lookup().banner());
                websocket::upgrade(ws, peer, greeting, &policy)
            }
            Err(rejection) => {
                tracing::debug!(remote_addr = %peer, error = %rejection, "Rejected WebSocket handshake");
                let mut response = rejection.into_response();
                policy.apply(response.headers_mut());
                response
            }
        };
        metrics::record_request("websocket", response.status().as_u16(), start);
        return response;
    }

    let body = match buffer_body(body, state.config.limits.max_body_bytes).await {
        Ok(body) => body,
        Err(mut response) => {
            policy.apply(response.headers_mut());
            metrics::record_request("rejected", response.status().as_u16(), start);
            return response;
        }
    };
    let captured = InboundRequest::from_parts(&parts, body, peer);
    log_request(&env, &captured);

    let mode = Mode::classify(parts.uri.path());
    let response = match mode {
        Mode::Frontend => frontend::page(&env, parts.uri.path(), &policy),
        Mode::Sse => {
            let hostname = if policy.disclose_hostname {
                Identity::lookup().hostname().map(str::to_owned)
            } else {
                None
            };
            sse::serve(
                captured,
                &policy,
                hostname,
                Duration::from_millis(state.config.sse.interval_ms),
                state.shutdown.subscribe(),
                peer,
                &state.sse_sessions,
                parts.version,
            )
        }
        Mode::Plain => response::plain(&captured, &policy, Identity::lookup),
    };

    metrics::record_request(mode.as_str(), response.status().as_u16(), start);
    response
}
