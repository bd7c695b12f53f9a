//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MemberId, RoleId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Role not found: {0}")]
    RoleNotFound(RoleId),

    #[error("No birthday registered for {0}")]
    BirthdayNotFound(MemberId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid birthday date '{0}': expected YYYY-MM-DD")]
    InvalidBirthdayDate(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Login not permitted for this account")]
    LoginNotPermitted,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::BirthdayNotFound(_) => "UNKNOWN_BIRTHDAY",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidBirthdayDate(_) => "INVALID_BIRTHDAY_DATE",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::LoginNotPermitted => "LOGIN_NOT_PERMITTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::PlatformError(_) => "PLATFORM_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_) | Self::RoleNotFound(_) | Self::BirthdayNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidBirthdayDate(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingPermission(_) | Self::LoginNotPermitted)
    }
}
