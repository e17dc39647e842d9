//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Table subsystems produce:
//!     → tracing events (table field on every event)
//!     → metrics.rs (reload counters, entry gauge)
//!
//! Consumers (binary only):
//!     → logging.rs (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The library only emits through the `tracing` and `metrics` facades
//! - Installing subscribers and exporters is left to the binary

pub mod logging;
pub mod metrics;
