//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use echo_server::config::EchoConfig;
use echo_server::echo::Environment;
use echo_server::lifecycle::{BoundListeners, Shutdown, StartupError};
use tokio::task::JoinHandle;

/// A running echo server on ephemeral ports.
pub struct TestServer {
    pub http: SocketAddr,
    pub grpc: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), StartupError>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.http, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.http, path)
    }

    pub fn grpc_url(&self) -> String {
        format!("http://{}", self.grpc)
    }

    /// Trigger shutdown and wait for both servers to stop.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Defaults with both listeners on `127.0.0.1:0`.
#[allow(dead_code)]
pub fn local_config() -> EchoConfig {
    let mut config = EchoConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.grpc.bind_address = "127.0.0.1:0".to_string();
    config.timeouts.shutdown_grace_secs = 1;
    config
}

/// Start with default settings and an empty environment.
#[allow(dead_code)]
pub async fn start() -> TestServer {
    start_with(local_config(), Environment::default()).await
}

/// Start with an explicit config and request-time environment.
#[allow(dead_code)]
pub async fn start_with(config: EchoConfig, environment: Environment) -> TestServer {
    let bound = BoundListeners::bind(config).await.unwrap();
    let http = bound.http_addr().unwrap();
    let grpc = bound.grpc_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(bound.serve_with_environment(shutdown.clone(), Arc::new(environment)));

    TestServer {
        http,
        grpc,
        shutdown,
        handle,
    }
}

/// Client that never pools connections between requests.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
