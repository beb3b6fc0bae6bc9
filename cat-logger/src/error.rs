use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent the logger from getting a file to write to.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
