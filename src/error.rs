use thiserror::Error;
use tracing::{error, warn};

use crate::shortcuts::{AcceleratorParseError, ProbeError, RegistryError};

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // informational
    Warning, // recoverable
    Error,   // operation failed
}

/// Domain-specific errors for the launcher core
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    AcceleratorParse(#[from] AcceleratorParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl LauncherError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Json(_) => ErrorSeverity::Warning,
            Self::Io { .. } => ErrorSeverity::Error,
            Self::AcceleratorParse(_) => ErrorSeverity::Info,
            Self::Registry(_) => ErrorSeverity::Warning,
            Self::Probe(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Json(e) => format!("Invalid data format: {}", e),
            Self::Io { path, .. } => format!("Could not read {}", path),
            Self::AcceleratorParse(e) => format!("Invalid shortcut: {}", e),
            Self::Registry(RegistryError::Conflict { owner, .. }) => {
                format!("Shortcut is already used by {}", owner)
            }
            Self::Registry(e) => e.to_string(),
            Self::Probe(_) => "Could not check shortcut conflicts".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use launcher_core::error::ResultExt;
///
/// let config = read_config().warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
