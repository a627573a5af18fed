//! Browser console for the WebSocket echo, served on `*/.ws`.
//!
//! The page connects back to the directory it was served from, optionally
//! prefixed with `WEBSOCKET_ROOT` for deployments behind a path-rewriting
//! proxy.

use axum::http::{header, HeaderValue};
use axum::response::Response;

use crate::echo::policy::WEBSOCKET_ROOT;
use crate::echo::{Environment, ResponsePolicy};

const TEMPLATE: &str = include_str!("../../assets/frontend.html");
const PATH_PLACEHOLDER: &str = "{{ .Path }}";

/// Render the console page for `request_path`.
pub fn page(env: &Environment, request_path: &str, policy: &ResponsePolicy) -> Response {
    let base = base_path(env.get(WEBSOCKET_ROOT).unwrap_or_default(), request_path);
    let literal = serde_json::to_string(&base).unwrap_or_else(|_| "\"/\"".to_string());
    let html = TEMPLATE.replace(PATH_PLACEHOLDER, &literal);

    let mut response = Response::new(html.into());
    let headers = response.headers_mut();
    policy.apply(headers);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    response
}

/// WebSocket path the page connects to: `root` joined with the directory of
/// `request_path`.
pub fn base_path(root: &str, request_path: &str) -> String {
    join(&[root, &parent_dir(request_path)])
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean_path(&path[..=i]),
        None => clean_path(""),
    }
}

fn join(parts: &[&str]) -> String {
    let joined: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if joined.is_empty() {
        return String::new();
    }
    clean_path(&joined.join("/"))
}

/// Lexically normalise a slash-separated path.
///
/// Duplicate slashes and `.` segments are removed, `..` removes the previous
/// segment (and is dropped at the root of an absolute path). An empty result
/// is `/` for absolute paths and `.` otherwise.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
