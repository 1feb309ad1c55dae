//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Build client → Startup hook (prime + spawn refresh loop)
//!     → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → server drains, refresh loop exits between cycles
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
