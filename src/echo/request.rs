//! Inbound request capture.
//!
//! # Responsibilities
//! - Snapshot method, target, protocol and host of a request
//! - Collect headers into a canonical, name-sorted multimap
//! - Hold the buffered body so it can be rendered and still forwarded
//!
//! # Design Decisions
//! - The HTTP stack lower-cases header names, so names are stored in canonical
//!   MIME form (`X-Custom-Header`) to keep rendered output readable
//! - `Host` is lifted out of the header block and rendered on its own line
//! - The body is `Bytes`: rendering borrows it, replaying it is a cheap clone

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::{header, request::Parts, HeaderMap, Version};
use bytes::Bytes;

/// Header multimap keyed by canonical name.
///
/// `BTreeMap` keeps names in byte-lexicographic order; each entry keeps
/// its values in arrival order.
pub type HeaderBlock = BTreeMap<String, Vec<String>>;

/// A captured request, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// Request method, e.g. `GET`.
    pub method: String,
    /// Path and query as received, e.g. `/test?x=1`.
    pub target: String,
    /// Protocol string, e.g. `HTTP/1.1` or `HTTP/2.0`.
    pub protocol: String,
    /// Host from the `Host` header or the URI authority.
    pub host: String,
    /// Peer address of the connection.
    pub remote_addr: String,
    /// All headers except `Host`.
    pub headers: HeaderBlock,
    /// Buffered request body, possibly empty.
    pub body: Bytes,
}

impl InboundRequest {
    /// Start building a request by hand.
    pub fn new(
        method: impl Into<String>,
        target: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            protocol: protocol.into(),
            host: String::new(),
            remote_addr: String::new(),
            headers: HeaderBlock::new(),
            body: Bytes::new(),
        }
    }

    /// Capture a request from its head and an already buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        let host = parts
            .headers
            .get(header::HOST)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self {
            method: parts.method.to_string(),
            target,
            protocol: protocol_name(parts.version).to_string(),
            host,
            remote_addr: remote_addr.to_string(),
            headers: collect_headers(&parts.headers),
            body,
        }
    }

    /// Set the host line.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Append one header value.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(canonical_header_name(name))
            .or_default()
            .push(value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Build the header block from a `HeaderMap`, dropping `Host`.
pub fn collect_headers(headers: &HeaderMap) -> HeaderBlock {
    let mut block = HeaderBlock::new();
    for (name, value) in headers {
        if name == header::HOST {
            continue;
        }
        block
            .entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    block
}

/// Canonical MIME form of a header name: first letter and every letter
/// after a hyphen upper-cased, the rest lower-cased.
///
/// Names containing bytes outside the token alphabet are returned unchanged.
pub fn canonical_header_name(name: &str) -> String {
    let valid = name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if !valid {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Protocol string for an HTTP version.
pub fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}
