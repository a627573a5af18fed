//! `SEND_HEADER_*` injection for the fixed routes.
//!
//! Echo responses apply the policy themselves (before their own content
//! headers); this layer covers health, throw and the pet store. Headers the
//! handler already set are left alone.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::echo::policy::injected_headers;
use crate::http::server::AppState;

pub async fn inject_response_headers(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let injected = injected_headers(&state.environment.snapshot());
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in injected {
        headers.entry(name).or_insert(value);
    }
    response
}
