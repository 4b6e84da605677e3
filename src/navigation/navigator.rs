//! Navigation history and dispatch.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::{ControllerError, Resolution, RouteTable};

/// Callback run when no group claims a location.
pub type Fallback = Box<dyn Fn(&str) + Send + Sync>;

/// Something that moves the application to a new location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Go to a path (history push).
    Navigate(String),
    /// Return to the previous location.
    Back,
}

/// Outcome of dispatching one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Matched(Resolution),
    Unmatched(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("action '{action}' of group '{group}' failed: {source}")]
    Controller {
        group: String,
        action: String,
        #[source]
        source: ControllerError,
    },
}

/// Drives controllers from navigation events.
pub struct Navigator {
    table: Arc<RouteTable>,
    history: Vec<String>,
    fallback: Option<Fallback>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("groups", &self.table.groups().len())
            .field("history", &self.history)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            history: Vec::new(),
            fallback: None,
        }
    }

    /// Set the callback for locations no group claims (e.g. a not-found view).
    pub fn with_fallback(mut self, fallback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Current location, if any navigation has happened.
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Every visited location, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Resolve `path` and invoke the matching action. Does not touch history.
    pub fn dispatch(&self, path: &str) -> Result<Dispatch, DispatchError> {
        let navigation_id = Uuid::new_v4();

        let Some((group, resolution)) = self.table.lookup(path) else {
            tracing::warn!(navigation_id = %navigation_id, path = %path, "No route matched");
            metrics::record_miss();
            if let Some(fallback) = &self.fallback {
                fallback(path);
            }
            return Ok(Dispatch::Unmatched(path.to_string()));
        };

        tracing::debug!(
            navigation_id = %navigation_id,
            path = %path,
            group = %resolution.group,
            action = %resolution.action,
            pattern = %resolution.pattern,
            "Dispatching"
        );

        group
            .controller()
            .invoke(&resolution.action, &resolution.params)
            .map_err(|source| DispatchError::Controller {
                group: resolution.group.clone(),
                action: resolution.action.clone(),
                source,
            })?;

        metrics::record_dispatch(&resolution.group, &resolution.action);
        Ok(Dispatch::Matched(resolution))
    }

    /// Push `path` onto the history and dispatch it.
    pub fn navigate(&mut self, path: &str) -> Result<Dispatch, DispatchError> {
        self.history.push(path.to_string());
        self.dispatch(path)
    }

    /// Step back one entry and dispatch it. `None` when already at the start.
    pub fn back(&mut self) -> Result<Option<Dispatch>, DispatchError> {
        if self.history.len() < 2 {
            return Ok(None);
        }
        self.history.pop();
        let previous = self.history.last().cloned().unwrap_or_default();
        self.dispatch(&previous).map(Some)
    }

    /// Dispatch `initial_path`, then process events until the channel closes
    /// or shutdown fires. Returns the navigator with its final history.
    pub async fn start(
        mut self,
        initial_path: &str,
        mut events: mpsc::UnboundedReceiver<NavigationEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<Self, DispatchError> {
        self.navigate(initial_path)?;
        tracing::info!(path = %initial_path, "Navigation started");

        let mut shutdown_open = true;
        loop {
            tokio::select! {
                biased;

                signal = shutdown.recv(), if shutdown_open => match signal {
                    Err(broadcast::error::RecvError::Closed) => shutdown_open = false,
                    _ => {
                        tracing::info!("Navigation stopped by shutdown");
                        break;
                    }
                },

                event = events.recv() => match event {
                    Some(NavigationEvent::Navigate(path)) => {
                        if let Err(e) = self.navigate(&path) {
                            tracing::error!(path = %path, error = %e, "Dispatch failed");
                        }
                    }
                    Some(NavigationEvent::Back) => match self.back() {
                        Ok(Some(_)) => {}
                        Ok(None) => tracing::debug!("Already at the start of history"),
                        Err(e) => tracing::error!(error = %e, "Dispatch failed"),
                    },
                    None => {
                        tracing::debug!("Navigation channel closed");
                        break;
                    }
                },
            }
        }

        Ok(self)
    }
}
