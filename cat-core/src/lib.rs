//! cat core library — client configuration, configuration sources, errors.
//!
//! Public API surface:
//! - [`config`] — [`ClientConfig`], [`ServerAddress`], [`ConfigSource`], [`YamlConfigSource`]
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;

pub use config::{ClientConfig, ConfigSource, ServerAddress, YamlConfigSource};
pub use error::ConfigError;
