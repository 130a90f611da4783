//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Could not find a member which matches the requested argument (`{0}`)")]
    MemberNotFound(String),

    #[error("No room has been joined yet")]
    NoRoom,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("The `{field}` property length should be {min}-{max} characters long")]
    InvalidSize {
        field: &'static str,
        min: u64,
        max: u64,
    },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl DomainError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::NoRoom => "NO_ROOM",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidSize { .. } => "INVALID_SIZE",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MemberNotFound(_) | Self::NoRoom)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidSize { .. })
    }
}
