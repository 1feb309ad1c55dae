//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → middleware/remote_config.rs (attach config snapshot)
//!     → handler reads Extension<RemoteConfig>
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{inject_remote_config, RemoteConfig};
pub use server::HttpServer;
