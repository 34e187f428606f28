//! Fix source error types

use std::fmt;

/// Failures reported by a fix source. None of these touch track state.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Positioning is not available on this host
    Unavailable { reason: String },
    /// The user or platform refused location access
    PermissionDenied,
    /// No reading arrived within the acquisition timeout
    Timeout { timeout_ms: u32 },
    /// Polled before `start` or after `stop`
    NotStarted,
    /// Acquisition options rejected by the source
    InvalidOptions { reason: String },
    /// A recorded fix log could not be read or parsed
    LogRead { message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable { reason } => {
                write!(f, "Location source unavailable: {}", reason)
            }
            SourceError::PermissionDenied => {
                write!(f, "Location permission denied")
            }
            SourceError::Timeout { timeout_ms } => {
                write!(f, "No location fix within {}ms", timeout_ms)
            }
            SourceError::NotStarted => {
                write!(f, "Location source not started")
            }
            SourceError::InvalidOptions { reason } => {
                write!(f, "Invalid acquisition options: {}", reason)
            }
            SourceError::LogRead { message } => {
                write!(f, "Fix log error: {}", message)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Result type for fix source operations
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Whether polling again later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Timeout { .. } | SourceError::NotStarted)
    }
}
