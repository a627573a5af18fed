//! Liveness and forced-error endpoints.

use axum::extract::Query;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::json;

/// `GET /health`
pub async fn health() -> Response {
    let body = json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

#[derive(Debug, Deserialize)]
pub struct ThrowParams {
    code: Option<String>,
}

/// `GET /throw?code=N`: respond with status `N`.
pub async fn throw(Query(params): Query<ThrowParams>) -> Response {
    match forced_status(params.code.as_deref()) {
        Some(status) => (
            status,
            Json(json!({ "error": format!("This is a forced error with status {}", status.as_u16()) })),
        )
            .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid status code" })),
        )
            .into_response(),
    }
}

fn forced_status(code: Option<&str>) -> Option<StatusCode> {
    let code: u16 = code?.trim().parse().ok()?;
    // Any of 100..=599 is a valid status, but hyper cannot send a 1xx as the
    // final response, so 100..=199 is rejected as invalid.
    if !(200..=599).contains(&code) {
        return None;
    }
    StatusCode::from_u16(code).ok()
}
