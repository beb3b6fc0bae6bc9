//! Controller startup, idempotence, and shutdown, observed through the log.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cat_client::{Collaborator, Collaborators, LifecycleController, ShutdownSignal};
use cat_core::{ClientConfig, ConfigError, ConfigSource, ServerAddress};
use cat_logger::{Logger, ManualClock, MemoryLogger, RotatingLogger, Severity};
use chrono::NaiveDate;
use tempfile::TempDir;
use tokio::runtime::Handle;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct StaticSource(Option<ClientConfig>);

impl ConfigSource for StaticSource {
    fn load(&self, domain: &str) -> Result<ClientConfig, ConfigError> {
        self.0
            .clone()
            .map(|config| ClientConfig {
                domain: domain.to_string(),
                ..config
            })
            .ok_or_else(|| ConfigError::NotFound {
                path: "/nonexistent/client.yaml".into(),
            })
    }
}

#[derive(Default)]
struct Launches {
    count: AtomicUsize,
    names: Mutex<Vec<&'static str>>,
}

struct Recording {
    name: &'static str,
    launches: Arc<Launches>,
}

#[async_trait]
impl Collaborator for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, mut shutdown: ShutdownSignal) {
        self.launches.count.fetch_add(1, Ordering::SeqCst);
        self.launches.names.lock().unwrap().push(self.name);
        shutdown.recv().await;
    }
}

fn recording(launches: &Arc<Launches>) -> Collaborators {
    let make = |name: &'static str| -> Arc<dyn Collaborator> {
        Arc::new(Recording {
            name,
            launches: Arc::clone(launches),
        })
    };
    Collaborators {
        router: make("router"),
        monitor: make("monitor"),
        sender: make("sender"),
        aggregator: make("aggregator"),
    }
}

fn valid_config() -> ClientConfig {
    ClientConfig {
        domain: "orders".to_string(),
        servers: vec![ServerAddress {
            host: "10.0.0.1".to_string(),
            port: 2280,
            http_port: 8080,
        }],
        log_dir: None,
    }
}

struct Harness {
    controller: LifecycleController,
    memory: Arc<MemoryLogger>,
    launches: Arc<Launches>,
}

fn harness(config: Option<ClientConfig>) -> Harness {
    let memory = Arc::new(MemoryLogger::new());
    let launches = Arc::new(Launches::default());
    let controller = LifecycleController::new(
        Handle::current(),
        memory.clone(),
        Arc::new(StaticSource(config)),
        recording(&launches),
    );
    Harness {
        controller,
        memory,
        launches,
    }
}

fn warnings(memory: &MemoryLogger) -> Vec<String> {
    memory
        .lines()
        .into_iter()
        .filter(|(severity, _)| *severity == Severity::Warning)
        .map(|(_, message)| message)
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Configuration failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inactive_before_initialization() {
    let h = harness(Some(valid_config()));
    assert!(!h.controller.is_active());
    assert!(h.controller.config().is_none());
}

#[tokio::test]
async fn config_failure_leaves_client_disabled() {
    let h = harness(None);
    h.controller.initialize("orders");
    tokio::task::yield_now().await;

    assert!(!h.controller.is_active());
    assert_eq!(h.controller.scheduler().task_count(), 0);
    assert_eq!(h.launches.count.load(Ordering::SeqCst), 0);

    let warnings = warnings(&h.memory);
    assert_eq!(warnings.len(), 1, "got: {warnings:?}");
    assert!(warnings[0].starts_with("Cat initialize failed"));
    assert!(warnings[0].contains("client config not found"));
    assert_eq!(h.memory.lines().len(), 1);
}

#[tokio::test]
async fn invalid_explicit_config_is_rejected() {
    let h = harness(None);
    h.controller.initialize_with_config(ClientConfig {
        servers: vec![],
        ..valid_config()
    });

    assert!(!h.controller.is_active());
    assert_eq!(h.controller.scheduler().task_count(), 0);
    assert_eq!(warnings(&h.memory).len(), 1);
}

// ---------------------------------------------------------------------------
// 2. Successful startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_initialize_enables_and_launches_all_collaborators() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("payments");

    assert!(h.controller.is_active());
    assert_eq!(h.memory.count(Severity::Info, "Cat has been enabled."), 1);
    assert_eq!(h.controller.scheduler().task_count(), 4);
    assert_eq!(
        h.controller.config().map(|c| c.domain.as_str()),
        Some("payments")
    );

    h.controller.shutdown();
    h.controller.scheduler().wait_stopped().await;

    assert_eq!(h.launches.count.load(Ordering::SeqCst), 4);
    let mut names = h.launches.names.lock().unwrap().clone();
    names.sort_unstable();
    assert_eq!(names, ["aggregator", "monitor", "router", "sender"]);
}

#[tokio::test]
async fn explicit_config_bypasses_the_source() {
    let h = harness(None);
    h.controller.initialize_with_config(valid_config());

    assert!(h.controller.is_active());
    assert!(warnings(&h.memory).is_empty());
    assert_eq!(h.controller.config(), Some(&valid_config()));
}

#[tokio::test]
async fn repeated_initialize_does_not_relaunch_or_relog() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("orders");
    h.controller.initialize("orders");
    h.controller.initialize_with_config(valid_config());

    assert_eq!(h.memory.count(Severity::Info, "Cat has been enabled."), 1);
    assert_eq!(h.controller.scheduler().task_count(), 4);

    h.controller.shutdown();
    h.controller.scheduler().wait_stopped().await;
    assert_eq!(h.launches.count.load(Ordering::SeqCst), 4);
}

// ---------------------------------------------------------------------------
// 3. Disable and shutdown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn explicit_disable_logs_once_and_shutdown_does_not_repeat_it() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("orders");

    h.controller.disable();
    h.controller.disable();
    assert!(!h.controller.is_active());

    h.controller.shutdown();
    h.controller.scheduler().wait_stopped().await;
    assert_eq!(h.memory.count(Severity::Info, "Cat has been disabled."), 1);
}

#[tokio::test]
async fn shutdown_clears_activation_and_stops_collaborators() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("orders");
    assert!(h.controller.is_active());

    h.controller.shutdown();
    assert!(!h.controller.is_active());
    assert!(h.controller.scheduler().is_shutting_down());

    h.controller.scheduler().wait_stopped().await;
    assert_eq!(h.controller.scheduler().task_count(), 0);
    assert_eq!(h.memory.count(Severity::Info, "Cat has been disabled."), 1);
}

#[tokio::test]
async fn initialize_after_disable_reenables_without_relaunching() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("orders");
    h.controller.disable();
    h.controller.initialize("orders");

    assert!(h.controller.is_active());
    assert_eq!(h.memory.count(Severity::Info, "Cat has been enabled."), 2);
    assert_eq!(h.controller.scheduler().task_count(), 4);

    h.controller.shutdown();
    h.controller.scheduler().wait_stopped().await;
    assert_eq!(h.launches.count.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn initialize_after_shutdown_is_refused() {
    let h = harness(Some(valid_config()));
    h.controller.initialize("orders");
    h.controller.shutdown();
    h.controller.scheduler().wait_stopped().await;

    h.controller.initialize("orders");
    h.controller.initialize_with_config(valid_config());
    tokio::task::yield_now().await;

    assert!(!h.controller.is_active());
    assert_eq!(h.controller.scheduler().task_count(), 0);
    assert_eq!(h.launches.count.load(Ordering::SeqCst), 4);
    assert_eq!(h.memory.count(Severity::Info, "Cat has been enabled."), 1);

    let warnings = warnings(&h.memory);
    assert_eq!(warnings.len(), 2, "got: {warnings:?}");
    assert!(warnings.iter().all(|w| w.contains("shutting down")));
}

#[tokio::test]
async fn initialize_without_prior_launch_after_shutdown_starts_nothing() {
    let h = harness(Some(valid_config()));
    h.controller.shutdown();
    h.controller.initialize("orders");
    tokio::task::yield_now().await;

    assert!(!h.controller.is_active());
    assert_eq!(h.controller.scheduler().task_count(), 0);
    assert_eq!(h.launches.count.load(Ordering::SeqCst), 0);
    assert_eq!(h.memory.count(Severity::Info, "Cat has been enabled."), 0);
}

// ---------------------------------------------------------------------------
// 4. With the file logger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn warning_lands_in_todays_log_file() {
    let dir = TempDir::new().unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 7, 3)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    let logger: Arc<dyn Logger> = Arc::new(
        RotatingLogger::open_with_clock(dir.path(), Arc::new(ManualClock::new(now))).unwrap(),
    );
    let launches = Arc::new(Launches::default());
    let controller = LifecycleController::new(
        Handle::current(),
        logger,
        Arc::new(StaticSource(None)),
        recording(&launches),
    );

    controller.initialize("orders");

    let content = fs::read_to_string(dir.path().join("cat_2024_07_03.log")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("2024/07/03 10:30:00 [Warning] Cat initialize failed"));
}
