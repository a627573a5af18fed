//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, CLI port overrides)
//!     → validation.rs (semantic checks)
//!     → EchoConfig (validated, immutable)
//!     → shared via Arc to both servers
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the server runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Request-time switches (`SEND_HEADER_*`, `SEND_SERVER_HOSTNAME`, ...) are
//!   not configuration: they are read from the environment on every request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::EchoConfig;
pub use schema::{GrpcConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, SseConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
