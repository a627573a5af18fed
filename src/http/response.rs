//! Plain HTTP echo response.
//!
//! Status 200, `text/plain`, an optional identity banner followed by a blank
//! line, then the rendered request.

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;
use bytes::{BufMut, BytesMut};

use crate::echo::{render_into, Identity, InboundRequest, ResponsePolicy};

/// Build the plain echo response.
///
/// `identity` is only consulted when the policy discloses the hostname.
pub fn plain(request: &InboundRequest, policy: &ResponsePolicy, identity: impl FnOnce() -> Identity) -> Response {
    let mut body = BytesMut::with_capacity(512 + request.body.len());
    if policy.disclose_hostname {
        body.put_slice(identity().banner().as_bytes());
        body.put_slice(b"\n\n");
    }
    render_into(request, &mut body);

    let mut response = Response::new(Body::from(body.freeze()));
    let headers = response.headers_mut();
    policy.apply(headers);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}
