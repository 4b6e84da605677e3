//! Shared utilities for integration tests.

use std::sync::Arc;

use webdm_routes::config::RouterConfig;
use webdm_routes::lifecycle::build_table;
use webdm_routes::routing::{RouteTable, SectionController};
use webdm_routes::sections;

/// The default webdm table plus handles on its section controllers.
pub struct Fixture {
    pub table: Arc<RouteTable>,
    pub sections: Vec<Arc<SectionController>>,
}

impl Fixture {
    pub fn new() -> Self {
        let sections = sections::section_controllers();
        let table = build_table(&RouterConfig::default(), &sections::registry(&sections)).unwrap();
        Self {
            table: Arc::new(table),
            sections,
        }
    }

    /// Section controller by name.
    #[allow(dead_code)]
    pub fn section(&self, name: &str) -> &SectionController {
        self.sections
            .iter()
            .find(|s| s.name() == name)
            .unwrap_or_else(|| panic!("no section named {}", name))
    }
}
