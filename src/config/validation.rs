//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route pattern compiles and names an action
//! - Validate value ranges (timeout > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Controller binding is checked later, when the table is built

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{Pattern, PatternError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route group has an empty name")]
    EmptyGroupName,

    #[error("route group '{0}' is declared more than once")]
    DuplicateGroup(String),

    #[error("route group '{0}' has no routes")]
    EmptyGroup(String),

    #[error("route '{pattern}' in group '{group}' has an empty action")]
    EmptyAction { group: String, pattern: String },

    #[error("route '{pattern}' in group '{group}' is invalid: {reason}")]
    InvalidPattern {
        group: String,
        pattern: String,
        reason: PatternError,
    },

    #[error("bind address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for group in &config.routes {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName);
        } else if !seen.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }

        if group.routes.is_empty() {
            errors.push(ValidationError::EmptyGroup(group.name.clone()));
        }

        for route in &group.routes {
            if route.action.trim().is_empty() {
                errors.push(ValidationError::EmptyAction {
                    group: group.name.clone(),
                    pattern: route.pattern.clone(),
                });
            }
            if let Err(reason) = Pattern::parse(&route.pattern) {
                errors.push(ValidationError::InvalidPattern {
                    group: group.name.clone(),
                    pattern: route.pattern.clone(),
                    reason,
                });
            }
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
