//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → ClientConfig handed to the remote-config client
//!     → StartupConfig handed to the startup hook
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs; only `client.app_id`
//!   must be supplied
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::ClientConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::StartupConfig;
pub use validation::ValidationError;
