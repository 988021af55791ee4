//! Error types shared across TrackDir crates.

use std::path::PathBuf;

/// Top-level error type for TrackDir operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackdirError {
    #[error("Scene error: {message}")]
    Scene { message: String },

    #[error("Host error: {message}")]
    Host { message: String },

    #[error("Reconcile error: {message}")]
    Reconcile { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TrackdirError.
pub type TrackdirResult<T> = Result<T, TrackdirError>;

impl TrackdirError {
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene {
            message: msg.into(),
        }
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host {
            message: msg.into(),
        }
    }

    pub fn reconcile(msg: impl Into<String>) -> Self {
        Self::Reconcile {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
