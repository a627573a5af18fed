//! Metrics collection and exposition.
//!
//! # Metrics
//! - `echo_requests_total` (counter): requests by mode and status
//! - `echo_request_duration_seconds` (histogram): time to produce response headers
//! - `echo_websocket_frames_total` (counter): echoed frames by kind
//! - `echo_sse_events_total` (counter): emitted events by type
//! - `echo_grpc_calls_total` (counter): unary calls by method
//! - `echo_active_connections` (gauge): open HTTP connections
//! - `echo_sse_sessions_active` (gauge): open SSE streams

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    counter!("echo_requests_total", "mode" => mode, "status" => status.to_string()).increment(1);
    histogram!("echo_request_duration_seconds", "mode" => mode).record(start.elapsed().as_secs_f64());
}

pub fn record_websocket_frame(kind: &'static str) {
    counter!("echo_websocket_frames_total", "kind" => kind).increment(1);
}

pub fn record_sse_event(event: &'static str) {
    counter!("echo_sse_events_total", "event" => event).increment(1);
}

pub fn record_grpc_call(method: &'static str) {
    counter!("echo_grpc_calls_total", "method" => method).increment(1);
}

pub fn connection_opened() {
    gauge!("echo_active_connections").increment(1.0);
}

pub fn connection_closed() {
    gauge!("echo_active_connections").decrement(1.0);
}

pub fn sse_session_opened() {
    gauge!("echo_sse_sessions_active").increment(1.0);
}

pub fn sse_session_closed() {
    gauge!("echo_sse_sessions_active").decrement(1.0);
}
