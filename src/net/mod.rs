//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept loop)
//!     → connection.rs (lifecycle tracking for graceful drain)
//!     → Hand off to HTTP layer (HTTP/1.1 or h2c) or gRPC layer
//! ```
//!
//! # Design Decisions
//! - No admission control: the OS accept backlog is the only queue
//! - Each HTTP connection is tracked for graceful shutdown
//! - Bind errors are typed so startup can fail fast

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
