//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Bind controllers → Build RouteTable
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → HTTP server drains, navigator stops
//!
//! Signals (signals.rs):
//!     SIGINT / SIGTERM → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The route table is built before anything listens

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::build_table;
