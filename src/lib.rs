//! Diagnostic echo server library.
//!
//! Reflects requests back to the caller over plain HTTP (HTTP/1.1 and h2c),
//! WebSocket, Server-Sent Events and unary gRPC, so proxies and load
//! balancers can be checked for what they forward.

pub mod config;
pub mod echo;
pub mod grpc;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod pets;

pub use config::schema::EchoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
