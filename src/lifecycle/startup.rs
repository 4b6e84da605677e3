//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind configured groups to registered controllers
//! - Build the immutable route table, failing fast on the first error
//!
//! # Design Decisions
//! - The table is passed explicitly to whoever needs it; there is no global

use crate::config::RouterConfig;
use crate::routing::{ControllerRegistry, RouteError, RouteTable};

/// Build the route table for a validated configuration.
pub fn build_table(
    config: &RouterConfig,
    controllers: &ControllerRegistry,
) -> Result<RouteTable, RouteError> {
    let table = RouteTable::from_config(&config.routes, controllers).inspect_err(|e| {
        tracing::error!(error = %e, "Route table rejected");
    })?;

    tracing::info!(
        groups = table.groups().len(),
        routes = table.route_count(),
        "Route table built"
    );
    Ok(table)
}
