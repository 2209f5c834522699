//! Error types for the playback layer.

use std::path::PathBuf;

/// Playback error type. The scheduler itself only fails when the sink does;
/// the remaining variants cover config loading and the run store.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Render sink failed: {message}")]
    Sink { message: String },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Results error: {0}")]
    Results(#[from] gr_results::ResultsError),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
