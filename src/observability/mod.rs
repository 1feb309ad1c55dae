//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client subsystem produces:
//!     → logging.rs (structured log events: fetch failures, updates)
//!     → metrics.rs (fetch/cycle counters, cache revision)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
