//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! sanitizer / validator / rate limiter / gate
//!     → logging.rs (structured events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Absorbed faults are always logged and counted; they never surface as errors
//! - Metrics calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
