//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / app / http produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Log filter from `RUST_LOG`, falling back to `observability.log_level`
//! - Prometheus recorder installed only when `metrics_enabled` is set

pub mod logging;
pub mod metrics;
