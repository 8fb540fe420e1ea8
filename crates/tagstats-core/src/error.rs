//! Shared error type across tagstats crates.

use thiserror::Error;

/// Stable error codes (used in logs and by tooling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Ring capacity is not a positive integer.
    InvalidCapacity,
    /// Configuration could not be parsed or failed validation.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal failure (I/O, rendering).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidCapacity => "INVALID_CAPACITY",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Unified error type used by core and collector.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid ring capacity: {0} (must be positive)")]
    InvalidCapacity(usize),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StatsError {
    /// Map error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StatsError::InvalidCapacity(_) => ErrorCode::InvalidCapacity,
            StatsError::BadConfig(_) => ErrorCode::BadConfig,
            StatsError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            StatsError::Internal(_) => ErrorCode::Internal,
        }
    }
}
