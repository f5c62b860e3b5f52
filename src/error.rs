use std::fmt;

use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Diagnostics reported by the driver for a failed statement.
///
/// Mirrors the classic `(sqlstate, driver code, message)` triple so callers can inspect what
/// went wrong after a failed execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Five character SQLSTATE, `HY000` when the driver has nothing more specific.
    pub sqlstate: String,
    /// Driver specific error code, if any.
    pub code: Option<i32>,
    /// Human readable message from the driver.
    pub message: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(sqlstate: impl Into<String>, code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            sqlstate: sqlstate.into(),
            code,
            message: message.into(),
        }
    }

    /// Generic diagnostics for failures the driver did not describe.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self::new("HY000", None, message)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] ({code}) {}", self.sqlstate, self.message),
            None => write!(f, "[{}] {}", self.sqlstate, self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum SqlRecordError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    Execution(ErrorInfo),
}

impl SqlRecordError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::ArgumentError(message.into())
    }

    /// Driver diagnostics attached to an execution failure.
    #[must_use]
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Execution(info) => Some(info),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ArgumentError(_))
    }

    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SqlRecordError>;
