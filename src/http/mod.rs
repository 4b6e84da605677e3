//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! GET request
//!     → server.rs (request id, tracing, timeout layers)
//!     → handlers.rs
//!         /_routes           → table listing
//!         /_routes/resolve   → Resolution or 404
//!         /metrics           → Prometheus text (when enabled)
//!         anything else      → RouteTable::resolve → app shell or 404
//! ```
//!
//! # Design Decisions
//! - Controllers run in the browser; the server only decides whether a
//!   deep link is a real route and serves the shell for it
//! - Unknown locations get a real 404 instead of the shell

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
