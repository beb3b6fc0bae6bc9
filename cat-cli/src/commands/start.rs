//! `catctl start` — open the log, bring the client up, wait for Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use cat_client::{Collaborators, LifecycleController};
use cat_core::config::default_log_dir_at;
use cat_core::{ConfigSource, YamlConfigSource};
use cat_logger::{Logger, RotatingLogger};

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Domain identifier of the monitored application.
    #[arg(long)]
    pub domain: String,

    /// Log directory; defaults to the config's `log_dir` or `~/.cat/logs`.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Write client log lines to stdout instead of the day's file.
    #[arg(long)]
    pub debug: bool,
}

impl StartArgs {
    pub fn run(self) -> Result<()> {
        init_tracing();
        let source = YamlConfigSource::from_home()?;
        let log_dir = self
            .log_dir
            .unwrap_or_else(|| resolve_log_dir(&source, &self.domain));

        // Without a log destination the client must not start.
        let logger: Arc<dyn Logger> = Arc::new(
            RotatingLogger::open(&log_dir)
                .with_context(|| format!("cannot open log in {}", log_dir.display()))?,
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        let controller = LifecycleController::new(
            runtime.handle().clone(),
            Arc::clone(&logger),
            Arc::new(source),
            Collaborators::idle(&logger),
        );
        if self.debug {
            controller.set_debug_output();
        }

        controller.initialize(&self.domain);
        if !controller.is_active() {
            println!(
                "client for '{}' is disabled; see {}",
                self.domain,
                log_dir.display()
            );
            return Ok(());
        }
        println!("client for '{}' is running; Ctrl-C to stop", self.domain);

        runtime.block_on(async {
            tokio::signal::ctrl_c()
                .await
                .context("ctrl-c handler failed")?;
            tracing::info!("received ctrl-c, shutting down client");
            controller.shutdown();
            controller.scheduler().wait_stopped().await;
            Ok::<(), anyhow::Error>(())
        })
    }
}

/// The config's `log_dir` when the config loads, the default directory otherwise.
fn resolve_log_dir(source: &YamlConfigSource, domain: &str) -> PathBuf {
    let home = source.home();
    source
        .load(domain)
        .map(|config| config.log_dir_or_default(home))
        .unwrap_or_else(|_| default_log_dir_at(home))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
