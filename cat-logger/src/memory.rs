//! In-memory logger for hosts that want to inspect what the client reported.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::logger::{Logger, Severity};

#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded lines with `severity` whose message equals `message`.
    pub fn count(&self, severity: Severity, message: &str) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, m)| *s == severity && m == message)
            .count()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, fmt::format(args)));
    }

    // Lines are always kept in memory.
    fn set_output(&self, _writer: Box<dyn Write + Send>) {}
}
