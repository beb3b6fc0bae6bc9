//! Shutdown coordination for the client's background tasks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::activation::Activation;
use crate::collaborator::ShutdownSignal;

/// How long collaborators get to finish after shutdown is requested.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Owns the shutdown signal every collaborator listens to and supervises
/// their teardown.
pub struct Scheduler {
    activation: Arc<Activation>,
    shutdown_tx: watch::Sender<bool>,
    stopped_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
    grace: Duration,
}

impl Scheduler {
    pub fn new(activation: Arc<Activation>, grace: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let (stopped_tx, _) = watch::channel(false);
        Self {
            activation,
            shutdown_tx,
            stopped_tx,
            tasks: Mutex::new(Vec::new()),
            grace,
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal::new(self.shutdown_tx.subscribe())
    }

    /// Register a launched collaborator so shutdown can wait for it.
    pub fn track(&self, name: &'static str, handle: JoinHandle<()>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, handle));
    }

    /// Collaborators launched and not yet reaped by [`Scheduler::run`].
    pub fn task_count(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Disable the client and tell every collaborator to stop.
    ///
    /// Returns immediately; [`Scheduler::wait_stopped`] resolves once the
    /// supervision loop has reaped the tasks.
    pub fn shutdown(&self) {
        self.activation.disable();
        if !self.shutdown_tx.send_replace(true) {
            tracing::info!("client shutdown requested");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Supervision loop: wait for shutdown, then join every tracked task
    /// within the grace period, aborting stragglers.
    pub async fn run(&self) {
        let mut signal = self.signal();
        signal.recv().await;

        let deadline = Instant::now() + self.grace;
        let tasks = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *tasks)
        };
        for (name, mut handle) in tasks {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => tracing::debug!(task = name, "collaborator stopped"),
                Ok(Err(err)) => tracing::error!(task = name, error = %err, "collaborator task failed"),
                Err(_) => {
                    tracing::warn!(
                        task = name,
                        grace = ?self.grace,
                        "collaborator did not stop in time, aborting"
                    );
                    handle.abort();
                }
            }
        }

        self.stopped_tx.send_replace(true);
    }

    /// Resolves after [`Scheduler::run`] has finished reaping collaborators.
    pub async fn wait_stopped(&self) {
        let mut stopped = self.stopped_tx.subscribe();
        let _ = stopped.wait_for(|done| *done).await;
    }
}
