//! gRPC echo subsystem.
//!
//! # Data Flow
//! ```text
//! gRPC listener
//!     → server.rs (tonic transport, reflection v1 + v1alpha)
//!     → proto.rs (generated echo.Echo stubs, prost messages, descriptor)
//!     → service.rs (EchoService: response.message = request.message)
//! ```
//!
//! # Design Decisions
//! - Message types and service stubs are generated from `proto/echo.proto` by
//!   `build.rs`, which needs `protoc` on the build host
//! - Reflection serves the descriptor encoded by the same build step

pub mod proto;
pub mod server;
pub mod service;

pub use proto::echo_client::EchoClient;
pub use proto::echo_server::{Echo, EchoServer};
pub use proto::{EchoRequest, EchoResponse};
pub use server::{GrpcServeError, GrpcServer};
pub use service::EchoService;
