//! Client configuration and the sources it is loaded from.
//!
//! # Storage layout
//!
//! ```text
//! ~/.cat/
//!   client.yaml   (servers + optional log_dir)
//!   logs/         (default log directory)
//! ```
//!
//! # API pattern
//!
//! Functions touching the filesystem take an explicit `home: &Path` (`fn_at`);
//! tests pass a `TempDir`. [`YamlConfigSource::from_home`] resolves the real
//! home through `dirs::home_dir()`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CLIENT_CONFIG_FILE: &str = "client.yaml";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// One collector server the client reports to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

/// Fully resolved configuration for one monitored domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub domain: String,
    pub servers: Vec<ServerAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// On-disk shape of `client.yaml`; the domain is supplied by the caller.
#[derive(Debug, Deserialize)]
struct ClientDocument {
    #[serde(default)]
    servers: Vec<ServerAddress>,
    #[serde(default)]
    log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Check the invariants every source must uphold before the client starts.
    ///
    /// # Errors
    /// [`ConfigError::InvalidDomain`] for an empty or malformed domain,
    /// [`ConfigError::NoServers`] when the server list is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_domain(&self.domain) {
            return Err(ConfigError::InvalidDomain(self.domain.clone()));
        }
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers {
                domain: self.domain.clone(),
            });
        }
        Ok(())
    }

    /// The configured log directory, or `<home>/.cat/logs`.
    pub fn log_dir_or_default(&self, home: &Path) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| default_log_dir_at(home))
    }
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

// ---------------------------------------------------------------------------
// 2. Path helpers
// ---------------------------------------------------------------------------

pub fn cat_root(home: &Path) -> PathBuf {
    home.join(".cat")
}

/// `<home>/.cat/client.yaml` — pure, no I/O.
pub fn client_config_path_at(home: &Path) -> PathBuf {
    cat_root(home).join(CLIENT_CONFIG_FILE)
}

/// `<home>/.cat/logs` — pure, no I/O.
pub fn default_log_dir_at(home: &Path) -> PathBuf {
    cat_root(home).join("logs")
}

pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// 3. Loading
// ---------------------------------------------------------------------------

/// Load and validate the configuration for `domain` from `<home>/.cat/client.yaml`.
///
/// # Errors
/// - [`ConfigError::NotFound`] if the file does not exist
/// - [`ConfigError::Parse`] if the YAML is malformed (includes path)
/// - validation errors from [`ClientConfig::validate`]
pub fn load_at(home: &Path, domain: &str) -> Result<ClientConfig, ConfigError> {
    let path = client_config_path_at(home);
    let raw = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound { path: path.clone() }
        } else {
            ConfigError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;

    let document: ClientDocument =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

    let config = ClientConfig {
        domain: domain.to_owned(),
        servers: document.servers,
        log_dir: document.log_dir,
    };
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// 4. Source seam
// ---------------------------------------------------------------------------

/// Where the client looks up configuration by domain identifier.
pub trait ConfigSource: Send + Sync {
    fn load(&self, domain: &str) -> Result<ClientConfig, ConfigError>;
}

/// Reads `client.yaml` below a fixed home directory.
#[derive(Debug, Clone)]
pub struct YamlConfigSource {
    home: PathBuf,
}

impl YamlConfigSource {
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn from_home() -> Result<Self, ConfigError> {
        Ok(Self::at(home()?))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

impl ConfigSource for YamlConfigSource {
    fn load(&self, domain: &str) -> Result<ClientConfig, ConfigError> {
        load_at(&self.home, domain)
    }
}
