//! Server-Sent Events stream session.
//!
//! # Responsibilities
//! - Frame typed events (`event:`, `data:` per line, `id:`, blank line)
//! - Emit `server` (optional), `request`, then a `time` event per interval
//! - End when the client goes away or the server shuts down
//!
//! # Data Flow
//! ```text
//! dispatch ──→ serve() ──→ Body::from_stream(event_stream)
//!                              │
//!                              ├── server  (hostname, when disclosed)
//!                              ├── request (rendered request)
//!                              └── time    (every interval, until cancelled)
//! ```
//!
//! # Design Decisions
//! - Each yielded chunk is one whole event; hyper writes it out as its own
//!   data frame, so nothing waits in a buffer between ticks
//! - Client disconnect drops the body stream, which drops the ticker with it
//! - Event payloads are bytes, so bodies that are not UTF-8 survive unchanged

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use axum::body::Body;
use axum::http::{header, HeaderValue, Version};
use axum::response::Response;
use bytes::{BufMut, Bytes, BytesMut};
use chrono::SecondsFormat;
use futures_util::Stream;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::echo::{render, InboundRequest, ResponsePolicy};
use crate::observability::metrics;

/// Encode one event.
///
/// `data` is split on `\n`; every piece becomes its own `data:` line, so a
/// payload ending in a newline produces a final empty `data:` line.
pub fn encode_event(event: &str, data: &[u8], id: u64) -> Bytes {
    let mut out = BytesMut::with_capacity(event.len() + data.len() + 32);
    out.put_slice(b"event: ");
    out.put_slice(event.as_bytes());
    out.put_u8(b'\n');
    for line in data.split(|b| *b == b'\n') {
        out.put_slice(b"data: ");
        out.put_slice(line);
        out.put_u8(b'\n');
    }
    out.put_slice(format!("id: {}\n\n", id).as_bytes());
    out.freeze()
}

/// Per-stream event numbering. Ids start at 1 and grow by one per event.
#[derive(Debug, Default)]
pub struct SseSession {
    last_id: u64,
}

impl SseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame the next event with a fresh id.
    pub fn next_event(&mut self, event: &'static str, data: &[u8]) -> Bytes {
        self.last_id += 1;
        tracing::trace!(event, id = self.last_id, "SSE event");
        metrics::record_sse_event(event);
        encode_event(event, data, self.last_id)
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

/// Count of SSE streams still held by a connection.
#[derive(Debug, Clone, Default)]
pub struct SseSessions {
    active: Arc<AtomicUsize>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn open(&self, peer: SocketAddr) -> StreamEnd {
        self.active.fetch_add(1, Ordering::SeqCst);
        metrics::sse_session_opened();
        StreamEnd {
            peer,
            sessions: self.clone(),
        }
    }
}

/// Logs and uncounts the end of a stream however it ends.
struct StreamEnd {
    peer: SocketAddr,
    sessions: SseSessions,
}

impl Drop for StreamEnd {
    fn drop(&mut self) {
        self.sessions.active.fetch_sub(1, Ordering::SeqCst);
        metrics::sse_session_closed();
        tracing::debug!(remote_addr = %self.peer, "SSE stream closed");
    }
}

/// The event sequence for one request.
///
/// `hostname` is `Some` only when disclosure is enabled and the lookup
/// succeeded.
pub fn event_stream(
    request: InboundRequest,
    hostname: Option<String>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
    peer: SocketAddr,
    sessions: &SseSessions,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    let end = sessions.open(peer);
    stream! {
        let _end = end;
        let mut session = SseSession::new();

        if let Some(hostname) = hostname {
            yield Ok(session.next_event("server", hostname.as_bytes()));
        }
        yield Ok::<_, Infallible>(session.next_event("request", &render(&request)));

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let tick = tokio::select! {
                _ = ticker.tick() => true,
                _ = shutdown.recv() => false,
            };
            if !tick {
                break;
            }
            let now = chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            yield Ok(session.next_event("time", now.as_bytes()));
        }
    }
}

/// Start the stream response.
pub fn serve(
    request: InboundRequest,
    policy: &ResponsePolicy,
    hostname: Option<String>,
    interval: Duration,
    shutdown: broadcast::Receiver<()>,
    peer: SocketAddr,
    sessions: &SseSessions,
    version: Version,
) -> Response {
    tracing::debug!(remote_addr = %peer, "SSE stream opened");
    let events = event_stream(request, hostname, interval, shutdown, peer, sessions);
    let mut response = Response::new(Body::from_stream(events));

    let headers = response.headers_mut();
    policy.apply(headers);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    // Connection-specific headers are forbidden in HTTP/2.
    if version < Version::HTTP_2 {
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    }
    response
}
