use std::fmt;
use std::io::Write;

/// Severity tag written in brackets after the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide logging service, shared as `Arc<dyn Logger>`.
///
/// Implementations never report failures to callers; a line that cannot be
/// written is handled inside the logger.
pub trait Logger: Send + Sync {
    fn log(&self, severity: Severity, args: fmt::Arguments<'_>);

    /// Send every following line to `writer` instead of the managed sink.
    fn set_output(&self, writer: Box<dyn Write + Send>);

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.debug(::std::format_args!($($arg)+))
    }};
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.info(::std::format_args!($($arg)+))
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.warning(::std::format_args!($($arg)+))
    }};
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.error(::std::format_args!($($arg)+))
    }};
}
