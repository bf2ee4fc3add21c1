use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a congestion control configuration.
///
/// The congestion hooks themselves never fail; only the configuration layer
/// that sits in front of them does.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown congestion control algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("invalid window configuration: {0}")]
    InvalidWindow(String),
}
