//! catctl — host process for the cat monitoring client.
//!
//! # Usage
//!
//! ```text
//! catctl start --domain <name> [--debug]
//! catctl check --domain <name> [--json]
//! catctl logs [--date YYYY-MM-DD] [--lines N] [--log-dir <path>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, logs::LogsArgs, start::StartArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "catctl",
    version,
    about = "Run and inspect the cat monitoring client",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the client in the foreground until Ctrl-C.
    Start(StartArgs),

    /// Load and validate the client configuration for a domain.
    Check(CheckArgs),

    /// Print recent lines of a day's log file.
    Logs(LogsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Logs(args) => args.run(),
    }
}
