//! `catctl logs` — tail a day's log file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use cat_core::config::{default_log_dir_at, home};
use cat_logger::naming::{latest_log_file, log_file_path};

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Day to show (YYYY-MM-DD); defaults to the newest log file.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Number of trailing lines to show.
    #[arg(long, default_value_t = 100)]
    pub lines: usize,

    /// Log directory; defaults to `~/.cat/logs`.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl LogsArgs {
    pub fn run(self) -> Result<()> {
        let log_dir = match self.log_dir {
            Some(dir) => dir,
            None => default_log_dir_at(&home()?),
        };

        let path = match self.date {
            Some(date) => log_file_path(&log_dir, date),
            None => match latest_log_file(&log_dir)
                .with_context(|| format!("read {}", log_dir.display()))?
            {
                Some((_, path)) => path,
                None => {
                    println!("no log files in {}", log_dir.display());
                    return Ok(());
                }
            },
        };

        print_tail(&path, self.lines)
    }
}

fn print_tail(path: &Path, lines: usize) -> Result<()> {
    if !path.exists() {
        println!("log file not found: {}", path.display());
        return Ok(());
    }

    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);

    println!("==> {} <==", path.display());
    if lines == 0 {
        return Ok(());
    }

    let mut tail = VecDeque::<String>::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        if tail.len() == lines {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    for line in tail {
        println!("{line}");
    }
    Ok(())
}
