//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics exporter when enabled
//! - Bind the HTTP and gRPC listeners
//! - Run both servers until shutdown or the first failure
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Both listeners bind before either serves, so a taken port never leaves
//!   half a service running
//! - The servers run side by side; the first error aborts the other

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use thiserror::Error;

use crate::config::EchoConfig;
use crate::echo::{EnvironmentSource, ProcessEnvironment};
use crate::grpc::{GrpcServeError, GrpcServer};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),

    #[error("gRPC server error: {0}")]
    Grpc(#[from] GrpcServeError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Both listeners, bound and not yet serving.
pub struct BoundListeners {
    config: Arc<EchoConfig>,
    http: Listener,
    grpc: Listener,
}

impl BoundListeners {
    /// Bind the HTTP listener, then the gRPC listener.
    pub async fn bind(config: EchoConfig) -> Result<Self, StartupError> {
        let http = Listener::bind(&config.listener.bind_address).await?;
        let grpc = Listener::bind(&config.grpc.bind_address).await?;
        Ok(Self {
            config: Arc::new(config),
            http,
            grpc,
        })
    }

    /// Actual HTTP address (resolves port 0).
    pub fn http_addr(&self) -> Result<SocketAddr, ListenerError> {
        self.http.local_addr().map_err(ListenerError::Accept)
    }

    /// Actual gRPC address (resolves port 0).
    pub fn grpc_addr(&self) -> Result<SocketAddr, ListenerError> {
        self.grpc.local_addr().map_err(ListenerError::Accept)
    }

    /// Serve with request-time switches read from the process environment.
    pub async fn serve(self, shutdown: Shutdown) -> Result<(), StartupError> {
        self.serve_with_environment(shutdown, Arc::new(ProcessEnvironment))
            .await
    }

    /// Serve both protocols until `shutdown` fires or one of them fails.
    pub async fn serve_with_environment(
        self,
        shutdown: Shutdown,
        environment: Arc<dyn EnvironmentSource>,
    ) -> Result<(), StartupError> {
        let Self {
            config,
            http: http_listener,
            grpc: grpc_listener,
        } = self;

        let grpc = GrpcServer::new(config.grpc.clone());
        let grpc_shutdown = shutdown.subscribe();
        let http = HttpServer::with_environment(config, shutdown, environment);

        tokio::try_join!(
            async move { http.run(http_listener).await.map_err(StartupError::from) },
            async move {
                grpc.run(grpc_listener, grpc_shutdown)
                    .await
                    .map_err(StartupError::from)
            }
        )?;
        Ok(())
    }
}

/// Start everything described by `config` and run until shutdown.
pub async fn run(config: EchoConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let bound = BoundListeners::bind(config).await?;
    bound.serve(shutdown).await
}
