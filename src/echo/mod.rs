//! Request reflection subsystem.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → request.rs (capture method/target/protocol/headers, buffer body)
//!     → policy.rs (environment snapshot → response headers + hostname toggle)
//!     → identity.rs (hostname banner)
//!     → render.rs (deterministic text)
//!     → transport (plain body, SSE event, WebSocket greeting)
//! ```
//!
//! # Design Decisions
//! - Rendering is pure: it reads an `InboundRequest` and writes into a caller supplied buffer
//! - The process environment is read through an `EnvironmentSource`, once per request
//! - Header names are canonicalised on capture so output is stable across HTTP versions

pub mod identity;
pub mod policy;
pub mod render;
pub mod request;

pub use identity::Identity;
pub use policy::{Environment, EnvironmentSource, ProcessEnvironment, ResponsePolicy};
pub use render::{render, render_into};
pub use request::InboundRequest;
