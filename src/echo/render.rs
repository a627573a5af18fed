//! Deterministic text rendering of a captured request.
//!
//! ```text
//! <METHOD> <TARGET> <PROTOCOL>
//!
//! Host: <host>
//! <Name>: <value>        (sorted by name, one line per value)
//!
//! <body>                 (blank line and body only when the body is non-empty)
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::echo::request::{HeaderBlock, InboundRequest};

/// Render a request into a new buffer.
pub fn render(request: &InboundRequest) -> Bytes {
    let mut out = BytesMut::with_capacity(256 + request.body.len());
    render_into(request, &mut out);
    out.freeze()
}

/// Render a request into `out`.
pub fn render_into<B: BufMut>(request: &InboundRequest, out: &mut B) {
    out.put_slice(request.method.as_bytes());
    out.put_u8(b' ');
    out.put_slice(request.target.as_bytes());
    out.put_u8(b' ');
    out.put_slice(request.protocol.as_bytes());
    out.put_slice(b"\n\n");

    out.put_slice(b"Host: ");
    out.put_slice(request.host.as_bytes());
    out.put_u8(b'\n');
    write_headers(&request.headers, out);

    if !request.body.is_empty() {
        out.put_u8(b'\n');
        out.put_slice(&request.body);
    }
}

/// Render only the header block, used for verbose request logging.
pub fn render_headers(headers: &HeaderBlock) -> String {
    let mut out = Vec::new();
    write_headers(headers, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn write_headers<B: BufMut>(headers: &HeaderBlock, out: &mut B) {
    for (name, values) in headers {
        for value in values {
            out.put_slice(name.as_bytes());
            out.put_slice(b": ");
            out.put_slice(value.as_bytes());
            out.put_u8(b'\n');
        }
    }
}
