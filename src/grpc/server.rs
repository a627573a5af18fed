//! gRPC server: the echo service plus reflection on its own port.
//!
//! # Responsibilities
//! - Serve `echo.Echo` over HTTP/2 with tonic
//! - Expose server reflection (v1 and v1alpha) when enabled
//! - Stop gracefully on the shutdown broadcast

use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::GrpcConfig;
use crate::grpc::proto::{self, echo_server::EchoServer};
use crate::grpc::service::EchoService;
use crate::net::Listener;

#[derive(Debug, Error)]
pub enum GrpcServeError {
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("reflection setup failed: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),
}

pub struct GrpcServer {
    config: GrpcConfig,
}

impl GrpcServer {
    pub fn new(config: GrpcConfig) -> Self {
        Self { config }
    }

    /// Serve on `listener` until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), GrpcServeError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                reflection = self.config.reflection,
                "gRPC server starting"
            );
        }

        let (reflection_v1, reflection_v1alpha) = if self.config.reflection {
            let v1 = tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
                .build_v1()?;
            let v1alpha = tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
                .build_v1alpha()?;
            (Some(v1), Some(v1alpha))
        } else {
            (None, None)
        };

        Server::builder()
            .add_service(EchoServer::new(EchoService))
            .add_optional_service(reflection_v1)
            .add_optional_service(reflection_v1alpha)
            .serve_with_incoming_shutdown(
                TcpListenerStream::new(listener.into_inner()),
                async move {
                    let _ = shutdown_rx.recv().await;
                },
            )
            .await?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
