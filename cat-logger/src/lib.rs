//! Day-rotating file logger for the cat client.
//!
//! Lines are appended to `<log_dir>/cat_<year>_<month>_<day>.log`; the file is
//! switched the first time a line is written on a new calendar day.

pub mod clock;
mod error;
mod logger;
pub mod memory;
pub mod naming;
mod rotating;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LogError;
pub use logger::{Logger, Severity};
pub use memory::MemoryLogger;
pub use naming::{log_file_name, log_file_path, parse_log_file_name};
pub use rotating::RotatingLogger;
