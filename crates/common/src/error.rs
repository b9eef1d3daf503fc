//! Error types shared across scenewatch crates.

use std::path::PathBuf;

/// Top-level error type for scenewatch operations.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The configuration file could not be parsed.
    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    /// The configuration parsed but is not usable (ambiguous presets,
    /// missing referenced files, out-of-range settings).
    #[error("Configuration validation error: {message}")]
    Validation { message: String },

    /// The external action command failed.
    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    /// A platform adapter failed or is unavailable.
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// Filesystem watching plumbing failed.
    #[error("Watch error: {message}")]
    Watch { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using WatchError.
pub type WatchResult<T> = Result<T, WatchError>;

impl WatchError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch {
            message: msg.into(),
        }
    }
}
