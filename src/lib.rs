//! Remote configuration middleware.
//!
//! Polls a config server for a fixed set of namespaces, caches the latest
//! documents per process and attaches a read-only snapshot to every request
//! handled by an Axum app.
//!
//! ```no_run
//! use axum::{middleware, routing::get, Extension, Router};
//! use remote_config_middleware::{
//!     inject_remote_config, ClientConfig, RemoteConfig, RemoteConfigClient, Shutdown,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RemoteConfigClient::new(ClientConfig::new("fastapi-test"))?;
//! let shutdown = Shutdown::new();
//!
//! // Startup hook: first fetch, then the background loop.
//! client
//!     .start_refresh_task(vec!["application".into()], shutdown.subscribe())
//!     .await;
//!
//! let app: Router = Router::new()
//!     .route(
//!         "/",
//!         get(|Extension(config): Extension<RemoteConfig>| async move {
//!             format!("{:?}", config.value("application", "key"))
//!         }),
//!     )
//!     .layer(middleware::from_fn_with_state(client, inject_remote_config));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use client::{ConfigSnapshot, RemoteConfigClient};
pub use config::{AppConfig, ClientConfig};
pub use http::{inject_remote_config, HttpServer, RemoteConfig};
pub use lifecycle::Shutdown;
