//! The webdm page sections.
//!
//! One controller per section of the web UI. Each declares the actions the
//! default route table refers to.

use std::sync::Arc;

use crate::routing::{Controller, ControllerRegistry, SectionController};

/// Section name and the actions its controller exposes.
pub const SECTIONS: &[(&str, &[&str])] = &[
    ("home", &["index"]),
    ("token", &["index"]),
    ("store", &["index"]),
    ("system", &["index"]),
    ("snap", &["snap"]),
    ("search", &["query"]),
];

/// Fresh controllers for every section, in table order.
pub fn section_controllers() -> Vec<Arc<SectionController>> {
    SECTIONS
        .iter()
        .map(|(name, actions)| Arc::new(SectionController::new(*name, actions.iter().copied())))
        .collect()
}

/// Register section controllers under their own names.
pub fn registry(sections: &[Arc<SectionController>]) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    for section in sections {
        let controller: Arc<dyn Controller> = section.clone();
        registry.register(section.name(), controller);
    }
    registry
}
