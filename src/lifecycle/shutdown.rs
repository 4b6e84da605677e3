//! Stop signal shared by the navigator and the HTTP server.
//!
//! `main` hands one receiver to [`HttpServer::run`] for graceful shutdown
//! and `routes-cli navigate` hands one to [`Navigator::start`], whose event
//! loop checks it ahead of pending navigation events.
//!
//! [`HttpServer::run`]: crate::http::HttpServer::run
//! [`Navigator::start`]: crate::navigation::Navigator::start

use tokio::sync::broadcast;

/// One-shot stop broadcast. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a navigation loop or server. Take it before spawning,
    /// or an early `trigger` is missed.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every navigation loop and server currently subscribed.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers = notified, "Shutdown triggered");
    }

    /// Loops and servers still holding a receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
