use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed opening or creating log file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing to {sink} sink")]
    Write {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log level {0:?}, expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidSeverity(String),

    #[error("invalid timestamp format {0:?}")]
    InvalidDatetimeFormat(String),

    #[error("failed serializing log record")]
    Serialization(#[from] serde_json::Error),

    #[error("a logger is already installed for the log facade")]
    AlreadyInstalled,
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(sink: impl Into<String>, source: std::io::Error) -> Self {
        LogError::Write {
            sink: sink.into(),
            source,
        }
    }
}
