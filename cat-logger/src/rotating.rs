use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::clock::{Clock, SystemClock};
use crate::error::LogError;
use crate::logger::{Logger, Severity};
use crate::naming::log_file_path;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
/// Minimum spacing between attempts to leave the stdout fallback.
const REOPEN_INTERVAL_SECS: i64 = 60;

/// Writes log lines to a file named after the current day, switching files
/// on the first write of each new day.
///
/// One guard covers both the day check and the append, so every line lands
/// in the file matching its own timestamp and racing writers at midnight
/// collapse into a single rotation.
pub struct RotatingLogger {
    log_dir: PathBuf,
    clock: Arc<dyn Clock>,
    state: Mutex<SinkState>,
}

struct SinkState {
    date: NaiveDate,
    sink: Sink,
}

enum Sink {
    File { path: PathBuf, file: File },
    /// Opening the day's file failed; lines go to stdout until a reopen
    /// at or after `retry_at` succeeds.
    Fallback {
        stdout: io::Stdout,
        retry_at: NaiveDateTime,
    },
    /// Installed by `set_output`; rotation no longer applies.
    Override(Box<dyn Write + Send>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Sink::File { file, .. } => file,
            Sink::Fallback { stdout, .. } => stdout,
            Sink::Override(writer) => writer.as_mut(),
        }
    }
}

impl RotatingLogger {
    /// Open today's log file under `log_dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Fails if the directory or file cannot be created. There is no fallback
    /// here: a process without a log destination should not start.
    pub fn open(log_dir: impl Into<PathBuf>) -> Result<Self, LogError> {
        Self::open_with_clock(log_dir, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        log_dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LogError> {
        let log_dir = log_dir.into();
        fs::create_dir_all(&log_dir).map_err(|source| LogError::CreateDir {
            path: log_dir.clone(),
            source,
        })?;

        let date = clock.now().date();
        let sink = open_day_file(&log_dir, date)?;

        Ok(Self {
            log_dir,
            clock,
            state: Mutex::new(SinkState { date, sink }),
        })
    }

    /// Path of the file currently written to, or `None` when writing to a stream.
    pub fn current_path(&self) -> Option<PathBuf> {
        match &self.lock().sink {
            Sink::File { path, .. } => Some(path.clone()),
            Sink::Fallback { .. } | Sink::Override(_) => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn rotate(&self, state: &mut SinkState, now: NaiveDateTime) {
        let date = now.date();
        state.sink = match open_day_file(&self.log_dir, date) {
            Ok(sink) => sink,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    "cannot open log file, logs will be redirected to stdout"
                );
                Sink::Fallback {
                    stdout: io::stdout(),
                    retry_at: now + Duration::seconds(REOPEN_INTERVAL_SECS),
                }
            }
        };
        state.date = date;
    }
}

fn open_day_file(log_dir: &Path, date: NaiveDate) -> Result<Sink, LogError> {
    let path = log_file_path(log_dir, date);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;
    tracing::info!(path = %path.display(), "log has been redirected to the file");
    Ok(Sink::File { path, file })
}

fn format_line(now: NaiveDateTime, severity: Severity, message: &str) -> String {
    format!("{} [{severity}] {message}\n", now.format(TIMESTAMP_FORMAT))
}

impl Logger for RotatingLogger {
    fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let message = fmt::format(args);

        let mut state = self.lock();
        // Read the clock under the guard so lines stay in timestamp order.
        let now = self.clock.now();
        let new_day = now.date() != state.date;
        let reopen = match &state.sink {
            Sink::File { .. } => new_day,
            Sink::Fallback { retry_at, .. } => new_day || now >= *retry_at,
            Sink::Override(_) => false,
        };
        if reopen {
            self.rotate(&mut state, now);
        }

        let line = format_line(now, severity, &message);
        let writer = state.sink.writer();
        if let Err(err) = writer.write_all(line.as_bytes()).and_then(|()| writer.flush()) {
            tracing::warn!(error = %err, "failed to write log line");
        }
    }

    fn set_output(&self, writer: Box<dyn Write + Send>) {
        self.lock().sink = Sink::Override(writer);
    }
}

impl fmt::Debug for RotatingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingLogger")
            .field("log_dir", &self.log_dir)
            .finish_non_exhaustive()
    }
}
