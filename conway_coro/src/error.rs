//! Error types for the runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("simulation driver is no longer running")]
    DriverGone,

    #[error("simulation driver panicked: {0}")]
    DriverPanicked(#[from] tokio::task::JoinError),

    #[error("failed to listen for Ctrl-C: {0}")]
    Signal(#[from] io::Error),
}
