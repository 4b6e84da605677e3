//! Route table for the webdm single-page web UI.
//!
//! Maps URL patterns to page-section controller actions, with a navigator
//! that dispatches history events and an HTTP surface that serves the
//! application shell for deep links.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;
pub mod sections;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use navigation::{Dispatch, NavigationEvent, Navigator};
pub use routing::{Resolution, RouteError, RouteTable};
