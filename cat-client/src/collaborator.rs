//! Background subsystems started by the controller.
//!
//! The controller only knows how to launch a collaborator and hand it a
//! shutdown signal; what a collaborator does while running is its own business.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use cat_logger::{log_info, Logger};

/// Resolves once the scheduler has started shutting the client down.
#[derive(Debug, Clone)]
pub struct ShutdownSignal(watch::Receiver<bool>);

impl ShutdownSignal {
    pub(crate) fn new(rx: watch::Receiver<bool>) -> Self {
        Self(rx)
    }

    /// Wait for shutdown. A dropped scheduler counts as shutdown.
    pub async fn recv(&mut self) {
        let _ = self.0.wait_for(|stopping| *stopping).await;
    }

    pub fn is_triggered(&self) -> bool {
        *self.0.borrow()
    }
}

/// A long-running subsystem launched once at startup.
#[async_trait]
pub trait Collaborator: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Run until `shutdown` fires. Failures are handled inside; nothing is
    /// reported back to the controller.
    async fn run(&self, shutdown: ShutdownSignal);
}

/// The four subsystems every client runs.
#[derive(Clone)]
pub struct Collaborators {
    pub router: Arc<dyn Collaborator>,
    pub monitor: Arc<dyn Collaborator>,
    pub sender: Arc<dyn Collaborator>,
    pub aggregator: Arc<dyn Collaborator>,
}

impl Collaborators {
    /// Placeholders that only announce start and stop.
    pub fn idle(logger: &Arc<dyn Logger>) -> Self {
        Self {
            router: Arc::new(Idle::new("router", Arc::clone(logger))),
            monitor: Arc::new(Idle::new("monitor", Arc::clone(logger))),
            sender: Arc::new(Idle::new("sender", Arc::clone(logger))),
            aggregator: Arc::new(Idle::new("aggregator", Arc::clone(logger))),
        }
    }

    pub fn all(&self) -> [Arc<dyn Collaborator>; 4] {
        [
            Arc::clone(&self.router),
            Arc::clone(&self.monitor),
            Arc::clone(&self.sender),
            Arc::clone(&self.aggregator),
        ]
    }
}

pub struct Idle {
    name: &'static str,
    logger: Arc<dyn Logger>,
}

impl Idle {
    pub fn new(name: &'static str, logger: Arc<dyn Logger>) -> Self {
        Self { name, logger }
    }
}

#[async_trait]
impl Collaborator for Idle {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, mut shutdown: ShutdownSignal) {
        log_info!(self.logger, "{} started.", self.name);
        shutdown.recv().await;
        log_info!(self.logger, "{} stopped.", self.name);
    }
}
