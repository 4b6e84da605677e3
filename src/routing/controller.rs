//! Controller capability and registry.
//!
//! A controller owns the actions of one page section. The route table only
//! needs to know which action names a controller answers to (checked when
//! the table is built) and how to invoke one with positional captures.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;

/// Errors raised by a controller while running an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("controller '{controller}' has no action '{action}'")]
    UnknownAction { controller: String, action: String },

    #[error("action '{action}' failed: {reason}")]
    Failed { action: String, reason: String },
}

/// A page-section controller.
pub trait Controller: Send + Sync + fmt::Debug {
    /// Action names this controller can run.
    fn actions(&self) -> &[String];

    /// Returns true if `action` can be invoked on this controller.
    fn handles(&self, action: &str) -> bool {
        self.actions().iter().any(|a| a == action)
    }

    /// Run an action with captures in pattern declaration order.
    fn invoke(&self, action: &str, params: &[Option<String>]) -> Result<(), ControllerError>;
}

/// One recorded action call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub action: String,
    pub params: Vec<Option<String>>,
}

/// Most recent calls kept per section; older ones are dropped.
pub const INVOCATION_HISTORY: usize = 256;

/// Controller for a single webdm page section.
///
/// Rendering happens in the browser, so invoking an action here logs it and
/// keeps the last [`INVOCATION_HISTORY`] calls.
#[derive(Debug)]
pub struct SectionController {
    name: String,
    actions: Vec<String>,
    invocations: Mutex<VecDeque<Invocation>>,
}

impl SectionController {
    pub fn new<I, S>(name: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            actions: actions.into_iter().map(Into::into).collect(),
            invocations: Mutex::new(VecDeque::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the recorded invocations, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .expect("section controller mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Drain the recorded invocations, oldest first.
    pub fn take_invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .expect("section controller mutex poisoned")
            .drain(..)
            .collect()
    }
}

impl Controller for SectionController {
    fn actions(&self) -> &[String] {
        &self.actions
    }

    fn invoke(&self, action: &str, params: &[Option<String>]) -> Result<(), ControllerError> {
        if !self.handles(action) {
            return Err(ControllerError::UnknownAction {
                controller: self.name.clone(),
                action: action.to_string(),
            });
        }

        tracing::info!(
            controller = %self.name,
            action = %action,
            params = ?params,
            "Rendering section"
        );

        let mut invocations = self
            .invocations
            .lock()
            .expect("section controller mutex poisoned");
        if invocations.len() == INVOCATION_HISTORY {
            invocations.pop_front();
        }
        invocations.push_back(Invocation {
            action: action.to_string(),
            params: params.to_vec(),
        });
        Ok(())
    }
}

/// Controllers available to the route table, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, controller: Arc<dyn Controller>) {
        self.controllers.insert(name.into(), controller);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Controller>> {
        self.controllers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
