//! Router middleware.

pub mod response_headers;

pub use response_headers::inject_response_headers;
