//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / navigation / http produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch and miss counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing fields, not formatted strings
//! - Navigation ID flows through every dispatch log line
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
