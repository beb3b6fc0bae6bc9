//! Error types for cat-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse client config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.cat/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The client config file did not exist at the expected path.
    #[error("client config not found at {path}")]
    NotFound { path: PathBuf },

    #[error("invalid domain '{0}': expected non-empty [A-Za-z0-9._-]")]
    InvalidDomain(String),

    #[error("no servers configured for domain '{domain}'")]
    NoServers { domain: String },
}
