//! `catctl check` — load the domain's configuration and print it.

use anyhow::{Context, Result};
use clap::Args;

use cat_core::{ConfigSource, YamlConfigSource};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain identifier of the monitored application.
    #[arg(long)]
    pub domain: String,

    /// Print the resolved configuration as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let source = YamlConfigSource::from_home()?;
        let config = source
            .load(&self.domain)
            .with_context(|| format!("configuration for '{}' is not usable", self.domain))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&config)
                    .context("failed to render configuration JSON")?
            );
            return Ok(());
        }

        println!("domain:  {}", config.domain);
        println!("log dir: {}", config.log_dir_or_default(source.home()).display());
        for server in &config.servers {
            println!("server:  {server} (http {})", server.http_port);
        }
        Ok(())
    }
}
