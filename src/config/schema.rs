//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Route groups, in match order.
    pub routes: Vec<GroupConfig>,

    /// HTTP surface settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A route group bound to one controller.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GroupConfig {
    /// Group identifier for logging and listings.
    pub name: String,

    /// Registered controller name (defaults to the group name).
    #[serde(default)]
    pub controller: Option<String>,

    /// Pattern → action mappings, tried in order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl GroupConfig {
    pub fn controller_name(&self) -> &str {
        self.controller.as_deref().unwrap_or(&self.name)
    }
}

/// A single pattern → action mapping.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    pub pattern: String,
    pub action: String,
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// HTML file served for every resolvable deep link.
    pub shell_path: Option<String>,

    /// Directory served under `/public` for the shell's scripts and styles.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            shell_path: None,
            static_dir: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose Prometheus metrics at `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }
}

/// The webdm page sections and their routes.
pub fn default_routes() -> Vec<GroupConfig> {
    let group = |name: &str, pattern: &str, action: &str| GroupConfig {
        name: name.to_string(),
        controller: None,
        routes: vec![RouteConfig {
            pattern: pattern.to_string(),
            action: action.to_string(),
        }],
    };

    vec![
        group("home", "/", "index"),
        group("token", "/access-control", "index"),
        group("store", "/store", "index"),
        group("system", "/system-settings", "index"),
        group("snap", "/snap/:id/(:section)", "snap"),
        group("search", "/search?q=:query", "query"),
    ]
}
