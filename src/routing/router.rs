//! Route table lookup.
//!
//! # Responsibilities
//! - Store compiled route groups in declaration order
//! - Resolve a location to the first matching group and route
//! - Check every referenced action against its controller at build time
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks)
//! - First match wins: group order, then route order within the group
//! - Overlapping groups are allowed; identical patterns in two groups are
//!   logged as shadowed
//! - Explicit `None` for no match rather than a silent default

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GroupConfig;
use crate::routing::controller::{Controller, ControllerRegistry};
use crate::routing::matcher::{capture, Captures, Location};
use crate::routing::pattern::Pattern;
use crate::routing::RouteError;

/// A single pattern → action mapping.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Pattern,
    action: String,
}

impl Route {
    pub fn new(pattern: &str, action: impl Into<String>) -> Result<Self, RouteError> {
        let pattern = Pattern::parse(pattern).map_err(|reason| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        })?;
        Ok(Self {
            pattern,
            action: action.into(),
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// A named set of routes bound to one controller.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    name: String,
    controller_name: String,
    controller: Arc<dyn Controller>,
    routes: Vec<Route>,
}

impl RouteGroup {
    /// Create an empty group whose controller is registered under the group name.
    pub fn new(name: impl Into<String>, controller: Arc<dyn Controller>) -> Self {
        let name = name.into();
        Self {
            controller_name: name.clone(),
            name,
            controller,
            routes: Vec::new(),
        }
    }

    /// Append a route. Routes are tried in the order they are added.
    pub fn route(mut self, pattern: &str, action: impl Into<String>) -> Result<Self, RouteError> {
        self.routes.push(Route::new(pattern, action)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.controller
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Match a raw location against this group's routes, in order.
    pub fn match_path(&self, path: &str) -> Option<Resolution> {
        self.match_location(&Location::parse(path))
    }

    fn match_location(&self, location: &Location<'_>) -> Option<Resolution> {
        self.routes.iter().find_map(|route| {
            capture(&route.pattern, location).map(|params| Resolution {
                group: self.name.clone(),
                action: route.action.clone(),
                pattern: route.pattern.source().to_string(),
                captures: route.pattern.captures().to_vec(),
                params,
            })
        })
    }
}

/// Result of resolving a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Group that claimed the location.
    pub group: String,
    /// Action to invoke on the group's controller.
    pub action: String,
    /// Pattern that matched, as written.
    pub pattern: String,
    /// Capture names in positional order.
    pub captures: Vec<String>,
    /// Captured values in positional order; `None` for absent optionals.
    pub params: Captures,
}

impl Resolution {
    /// Look up a captured value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.params.get(i))
            .and_then(|v| v.as_deref())
    }
}

/// Serializable view of one route, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescription {
    pub group: String,
    pub controller: String,
    pub pattern: String,
    pub action: String,
    pub captures: Vec<String>,
}

/// The application's route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    /// Build a table from groups, failing on the first configuration error.
    pub fn new(groups: Vec<RouteGroup>) -> Result<Self, RouteError> {
        let mut names = HashSet::new();
        for group in &groups {
            if !names.insert(group.name.as_str()) {
                return Err(RouteError::DuplicateGroup(group.name.clone()));
            }
            for route in &group.routes {
                if !group.controller.handles(&route.action) {
                    return Err(RouteError::MissingHandler {
                        group: group.name.clone(),
                        action: route.action.clone(),
                    });
                }
            }
        }

        let table = Self { groups };
        table.warn_shadowed();
        Ok(table)
    }

    /// Build a table from configuration, binding each group to a registered controller.
    pub fn from_config(
        config: &[GroupConfig],
        controllers: &ControllerRegistry,
    ) -> Result<Self, RouteError> {
        let mut groups = Vec::with_capacity(config.len());
        for group_config in config {
            let controller_name = group_config.controller_name();
            let controller =
                controllers
                    .get(controller_name)
                    .ok_or_else(|| RouteError::UnknownController {
                        group: group_config.name.clone(),
                        controller: controller_name.to_string(),
                    })?;

            let mut group = RouteGroup::new(group_config.name.clone(), controller);
            group.controller_name = controller_name.to_string();
            for route in &group_config.routes {
                group = group.route(&route.pattern, route.action.clone())?;
            }
            groups.push(group);
        }
        Self::new(groups)
    }

    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&RouteGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn route_count(&self) -> usize {
        self.groups.iter().map(|g| g.routes.len()).sum()
    }

    /// Resolve a location across all groups; first match wins.
    pub fn resolve(&self, path: &str) -> Option<Resolution> {
        self.lookup(path).map(|(_, resolution)| resolution)
    }

    /// Like [`resolve`](Self::resolve) but also returns the owning group.
    pub fn lookup(&self, path: &str) -> Option<(&RouteGroup, Resolution)> {
        let location = Location::parse(path);
        self.groups
            .iter()
            .find_map(|group| group.match_location(&location).map(|r| (group, r)))
    }

    /// Flat listing of every route in match order.
    pub fn describe(&self) -> Vec<RouteDescription> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.routes.iter().map(move |route| RouteDescription {
                    group: group.name.clone(),
                    controller: group.controller_name.clone(),
                    pattern: route.pattern.source().to_string(),
                    action: route.action.clone(),
                    captures: route.pattern.captures().to_vec(),
                })
            })
            .collect()
    }

    fn warn_shadowed(&self) {
        for (i, group) in self.groups.iter().enumerate() {
            for route in &group.routes {
                let earlier = self.groups[..i].iter().find(|g| {
                    g.routes
                        .iter()
                        .any(|r| r.pattern.path == route.pattern.path && r.pattern.query == route.pattern.query)
                });
                if let Some(earlier) = earlier {
                    tracing::warn!(
                        group = %group.name,
                        pattern = %route.pattern,
                        shadowed_by = %earlier.name,
                        "Route is shadowed by an earlier group"
                    );
                }
            }
        }
    }
}
