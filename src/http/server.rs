//! HTTP server setup and the shared-port accept loop.
//!
//! # Responsibilities
//! - Create the Axum router: fixed routes, then the echo dispatcher fallback
//! - Wire up middleware (tracing, header timeout, injected headers)
//! - Serve HTTP/1.1 and cleartext HTTP/2 on the same listener
//! - Track connections and drain them on shutdown
//!
//! # Data Flow
//! ```text
//! Listener::accept()
//!     → ConnectionTracker::track()
//!     → hyper-util auto builder (sniffs the HTTP/2 preface, else HTTP/1.1)
//!     → Router (health, throw, pets, fallback → dispatch::echo_handler)
//!       (a known path with an unrouted method also falls back to the echo)
//! ```
//!
//! # Design Decisions
//! - A hand-written accept loop instead of `axum::serve`, so each connection
//!   gets the auto (h1 + h2c) builder with upgrade support
//! - h2c uses prior knowledge; the HTTP/1.1 `Upgrade: h2c` dance is not offered
//! - The request timeout bounds time to response headers, so streams (SSE,
//!   WebSocket) are not cut off by it

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, FromRef};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use tokio::sync::broadcast;
use tower::Service;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EchoConfig;
use crate::echo::{EnvironmentSource, ProcessEnvironment};
use crate::http::middleware::inject_response_headers;
use crate::http::sse::SseSessions;
use crate::http::{dispatch, health};
use crate::lifecycle::Shutdown;
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::pets::{self, PetStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EchoConfig>,
    pub environment: Arc<dyn EnvironmentSource>,
    pub pets: Arc<PetStore>,
    pub sse_sessions: SseSessions,
    pub shutdown: Shutdown,
}

impl FromRef<AppState> for Arc<PetStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.pets)
    }
}

/// HTTP server for the echo service.
pub struct HttpServer {
    router: Router,
    config: Arc<EchoConfig>,
    sse_sessions: SseSessions,
    shutdown_rx: broadcast::Receiver<()>,
}

impl HttpServer {
    /// Create a server reading request-time switches from the process
    /// environment.
    pub fn new(config: Arc<EchoConfig>, shutdown: Shutdown) -> Self {
        Self::with_environment(config, shutdown, Arc::new(ProcessEnvironment))
    }

    /// Create a server with an explicit environment source.
    pub fn with_environment(
        config: Arc<EchoConfig>,
        shutdown: Shutdown,
        environment: Arc<dyn EnvironmentSource>,
    ) -> Self {
        let shutdown_rx = shutdown.subscribe();
        let sse_sessions = SseSessions::new();
        let state = AppState {
            config: Arc::clone(&config),
            environment,
            pets: Arc::new(PetStore::seeded()),
            sse_sessions: sse_sessions.clone(),
            shutdown,
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            sse_sessions,
            shutdown_rx,
        }
    }

    /// Live count of SSE streams served by this instance.
    pub fn sse_sessions(&self) -> SseSessions {
        self.sse_sessions.clone()
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &EchoConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health::health))
            .route("/throw", get(health::throw))
            .merge(pets::routes())
            .method_not_allowed_fallback(dispatch::echo_handler)
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                inject_response_headers,
            ))
            .fallback(dispatch::echo_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until shutdown, accepting connections on `listener`.
    pub async fn run(mut self, listener: Listener) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(address = %addr, "HTTP server starting (HTTP/1.1 + h2c)");

        let tracker = ConnectionTracker::new();
        let builder = Builder::new(TokioExecutor::new());

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        continue;
                    }
                },
                _ = self.shutdown_rx.recv() => break,
            };

            let guard = tracker.track();
            let builder = builder.clone();
            let router = self.router.clone();
            tokio::spawn(async move {
                let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
                    request.extensions_mut().insert(ConnectInfo(peer));
                    router.clone().call(request)
                });

                if let Err(e) = builder
                    .serve_connection_with_upgrades(TokioIo::new(stream), service)
                    .await
                {
                    tracing::debug!(remote_addr = %peer, connection_id = %guard.id(), error = %e, "Connection ended with error");
                }
                drop(guard);
            });
        }

        tracing::info!(
            active = tracker.active_count(),
            "HTTP server stopped accepting, draining connections"
        );
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        if tokio::time::timeout(grace, tracker.wait_for_shutdown()).await.is_err() {
            tracing::warn!(
                remaining = tracker.active_count(),
                "Shutdown grace period elapsed with connections still open"
            );
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

