//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, timeout, headers)
//! - Serve plain HTTP or TLS on an already bound listener
//! - Shut down gracefully when the lifecycle coordinator fires

use std::path::Path;
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, HeaderValue},
    middleware,
    routing::{get, head, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer};

use crate::config::{PayloadConfig, ServerConfig};
use crate::endpoints::{
    download, download::zero_payload, ping, upload, DOWNLOAD_PATH, PING_PATH, UPLOAD_PATH,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::{metrics, tracing::trace_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Zero-filled download body, shared by every response.
    pub payload: Bytes,
    /// Upload size limit, if any.
    pub max_upload_bytes: Option<usize>,
}

impl AppState {
    pub fn new(config: &PayloadConfig) -> Self {
        Self {
            payload: zero_payload(config.download_bytes),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Error type for running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// HTTP server for the speed-test endpoints.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let router = Self::build_router(&config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig) -> Router {
        let state = AppState::new(&config.payload);

        let mut router = Router::new()
            .route(DOWNLOAD_PATH, get(download))
            .route(PING_PATH, head(ping))
            .route(UPLOAD_PATH, post(upload))
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .with_state(state);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(trace_layer())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;

        match &self.config.listener.tls {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
            Some(tls) => {
                let rustls =
                    load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
                let handle = axum_server::Handle::new();

                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!(grace_secs = grace.as_secs(), "Shutdown signal received");
                    shutdown_handle.graceful_shutdown(Some(grace));
                });

                tracing::info!(address = %addr, "HTTPS server starting");
                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
