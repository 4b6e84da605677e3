//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (path + optional query)
//!     → matcher.rs (normalize location, walk patterns)
//!     → router.rs (group order, then route order)
//!     → Return: Resolution { group, action, params } or None
//!
//! Table Compilation (at startup):
//!     GroupConfig[]
//!     → pattern.rs (compile patterns)
//!     → controller.rs (bind controllers, check actions exist)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (small backtracking matcher)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod controller;
pub mod matcher;
pub mod pattern;
pub mod router;

use thiserror::Error;

pub use controller::{Controller, ControllerError, ControllerRegistry, Invocation, SectionController};
pub use matcher::{Captures, Location};
pub use pattern::{Pattern, PatternError};
pub use router::{Resolution, Route, RouteDescription, RouteGroup, RouteTable};

/// Errors raised while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        #[source]
        reason: PatternError,
    },

    #[error("group '{group}' routes to action '{action}', which its controller does not implement")]
    MissingHandler { group: String, action: String },

    #[error("group '{group}' references unknown controller '{controller}'")]
    UnknownController { group: String, controller: String },

    #[error("group '{0}' is declared more than once")]
    DuplicateGroup(String),
}
