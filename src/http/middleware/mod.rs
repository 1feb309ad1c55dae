//! Request middleware.

pub mod remote_config;

pub use remote_config::{inject_remote_config, RemoteConfig};
