//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the host application's handlers
//! - Wire up middleware (remote config, timeout, tracing)
//! - Run the startup hook before accepting traffic
//! - Bind server to listener and drain on shutdown

use std::time::Duration;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::client::RemoteConfigClient;
use crate::config::AppConfig;
use crate::http::middleware::{inject_remote_config, RemoteConfig};

/// HTTP server for the host application.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    client: RemoteConfigClient,
}

impl HttpServer {
    /// Create a new HTTP server around an existing client handle.
    pub fn new(config: AppConfig, client: RemoteConfigClient) -> Self {
        let router = Self::build_router(&config, client.clone());
        Self {
            router,
            config,
            client,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, client: RemoteConfigClient) -> Router {
        Router::new()
            .route("/health_check", get(health_check))
            .route("/config", get(get_config))
            .route("/config/{namespace}", get(get_namespace))
            .layer(middleware::from_fn_with_state(client, inject_remote_config))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn client(&self) -> &RemoteConfigClient {
        &self.client
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        let refresh = self
            .client
            .start_refresh_task(self.config.startup.namespaces.clone(), shutdown.resubscribe())
            .await;

        tracing::info!(address = %addr, "HTTP server starting");

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        stop_refresh_task(refresh, served).await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for the refresh task once serving has ended.
///
/// On a serve error the shutdown signal never fired, so the task is aborted.
async fn stop_refresh_task(
    refresh: JoinHandle<()>,
    served: Result<(), std::io::Error>,
) -> Result<(), std::io::Error> {
    if let Err(e) = &served {
        tracing::error!(error = %e, "HTTP server failed, stopping refresh task");
        refresh.abort();
    }

    if let Err(e) = refresh.await {
        if e.is_panic() {
            tracing::error!(error = %e, "Refresh task panicked");
        }
    }

    served
}

async fn health_check(Extension(config): Extension<RemoteConfig>) -> Json<Value> {
    tracing::debug!(
        namespaces = config.len(),
        revision = config.revision(),
        "Health check"
    );
    Json(json!({ "msg": "ok" }))
}

async fn get_config(Extension(config): Extension<RemoteConfig>) -> Json<Value> {
    Json(config.to_json())
}

async fn get_namespace(
    Path(namespace): Path<String>,
    Extension(config): Extension<RemoteConfig>,
) -> Response {
    match config.get(&namespace) {
        Some(document) => Json(Value::Object(document.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("No configuration for namespace {namespace:?}"),
        )
            .into_response(),
    }
}
