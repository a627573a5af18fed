//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Bind HTTP + gRPC listeners → Serve both concurrently
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → End SSE streams → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a listener that cannot bind or serve stops the whole process
//! - Both listeners are bound before either starts serving
//! - Shutdown has timeout: connections still open after the grace period are abandoned

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{BoundListeners, StartupError};
