//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (HTTP/1.1 or h2c, router, middleware)
//!     → health.rs / pets (fixed routes)
//!     → dispatch.rs (everything else)
//!         → request.rs (upgrade detection, body buffering, logging)
//!         → websocket.rs | frontend.rs | sse.rs | response.rs
//!     → Send to client
//! ```

pub mod dispatch;
pub mod frontend;
pub mod health;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod sse;
pub mod websocket;

pub use dispatch::Mode;
pub use server::{AppState, HttpServer};
pub use sse::SseSessions;
