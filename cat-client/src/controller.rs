use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;

use cat_core::{ClientConfig, ConfigError, ConfigSource};
use cat_logger::{log_warning, Logger};

use crate::activation::Activation;
use crate::collaborator::Collaborators;
use crate::scheduler::{Scheduler, DEFAULT_SHUTDOWN_GRACE};

/// Brings the client online once and answers whether it is active.
///
/// Initialization never fails toward the caller: a configuration problem is
/// logged as a warning and leaves the client disabled.
pub struct LifecycleController {
    runtime: Handle,
    logger: Arc<dyn Logger>,
    config_source: Arc<dyn ConfigSource>,
    collaborators: Collaborators,
    activation: Arc<Activation>,
    scheduler: Arc<Scheduler>,
    config: OnceLock<ClientConfig>,
    launched: AtomicBool,
}

impl LifecycleController {
    /// `runtime` is where background collaborators are spawned.
    pub fn new(
        runtime: Handle,
        logger: Arc<dyn Logger>,
        config_source: Arc<dyn ConfigSource>,
        collaborators: Collaborators,
    ) -> Self {
        let activation = Arc::new(Activation::new(Arc::clone(&logger)));
        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&activation),
            DEFAULT_SHUTDOWN_GRACE,
        ));
        Self {
            runtime,
            logger,
            config_source,
            collaborators,
            activation,
            scheduler,
            config: OnceLock::new(),
            launched: AtomicBool::new(false),
        }
    }

    /// Look up configuration for `domain` and start the client.
    pub fn initialize(&self, domain: &str) {
        let loaded = self.config_source.load(domain);
        self.start(loaded);
    }

    /// Start the client with configuration supplied by the caller.
    pub fn initialize_with_config(&self, config: ClientConfig) {
        let checked = config.validate().map(|()| config);
        self.start(checked);
    }

    fn start(&self, config: Result<ClientConfig, ConfigError>) {
        let config = match config {
            Ok(config) => config,
            Err(err) => {
                log_warning!(self.logger, "Cat initialize failed: {err}");
                return;
            }
        };
        if self.scheduler.is_shutting_down() {
            log_warning!(self.logger, "Cat initialize ignored: client is shutting down.");
            return;
        }
        let _ = self.config.set(config);

        self.activation.enable();
        // A shutdown racing this call wins: undo the enable it may have missed.
        if self.scheduler.is_shutting_down() {
            self.activation.disable();
            return;
        }
        // Collaborators are launched once per controller, whatever the flag did since.
        if !self.launched.swap(true, Ordering::AcqRel) {
            self.launch();
        }
    }

    fn launch(&self) {
        for collaborator in self.collaborators.all() {
            let name = collaborator.name();
            let signal = self.scheduler.signal();
            let handle = self
                .runtime
                .spawn(async move { collaborator.run(signal).await });
            self.scheduler.track(name, handle);
        }

        let scheduler = Arc::clone(&self.scheduler);
        self.runtime.spawn(async move { scheduler.run().await });
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_enabled()
    }

    pub fn disable(&self) {
        self.activation.disable();
    }

    /// Hand teardown to the scheduler, which also clears the activation flag.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    /// Send all further log lines to stdout instead of the day's file.
    pub fn set_debug_output(&self) {
        self.logger.set_output(Box::new(io::stdout()));
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Configuration of the first successful initialization.
    pub fn config(&self) -> Option<&ClientConfig> {
        self.config.get()
    }
}
