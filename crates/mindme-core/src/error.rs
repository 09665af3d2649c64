//! Shared error type across MindMe crates.

use thiserror::Error;

/// Stable error codes surfaced to callers and used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Payload could not be decoded.
    BadPayload,
    /// Wire payload version is not understood.
    UnsupportedVersion,
    /// Caller failed identity verification.
    SecurityDenied,
    /// Host callback channel is gone.
    HostUnavailable,
    /// Configuration could not be read or failed validation.
    InvalidConfig,
    /// Service was already torn down.
    Destroyed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadPayload => "BAD_PAYLOAD",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::SecurityDenied => "SECURITY_DENIED",
            ErrorCode::HostUnavailable => "HOST_UNAVAILABLE",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::Destroyed => "DESTROYED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("bad payload: {0}")]
    BadPayload(String),
    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(i32),
    #[error("security: {0}")]
    SecurityDenied(String),
    #[error("host unavailable: {0}")]
    HostUnavailable(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("extension service destroyed")]
    Destroyed,
    #[error("internal: {0}")]
    Internal(String),
}

impl ExtensionError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtensionError::BadPayload(_) => ErrorCode::BadPayload,
            ExtensionError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            ExtensionError::SecurityDenied(_) => ErrorCode::SecurityDenied,
            ExtensionError::HostUnavailable(_) => ErrorCode::HostUnavailable,
            ExtensionError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            ExtensionError::Destroyed => ErrorCode::Destroyed,
            ExtensionError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<serde_json::Error> for ExtensionError {
    fn from(err: serde_json::Error) -> Self {
        ExtensionError::BadPayload(err.to_string())
    }
}
